use super::*;

fn tmp_dir(tag: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "stepdeck_artifacts_{tag}_{}_{nanos}",
        std::process::id()
    ))
}

#[test]
fn identical_content_shares_an_address() {
    let a = ContentHash::of(b"<svg>page</svg>");
    let b = ContentHash::of(b"<svg>page</svg>");
    let c = ContentHash::of(b"<svg>other</svg>");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.to_hex().len(), 32);
    assert_eq!(ContentHash::from_hex(&a.to_hex()), Some(a));
    assert_eq!(ContentHash::from_hex("queries"), None);
}

#[test]
fn artifact_paths_use_hash_and_extension() {
    let dir = tmp_dir("paths");
    let store = ArtifactStore::open(&dir, ".png").unwrap();
    let hash = ContentHash::of(b"x");
    assert_eq!(store.extension(), "png");
    assert_eq!(
        store.path_for(hash),
        dir.join(format!("{}.png", hash.to_hex()))
    );
    assert!(!store.contains(hash));
    std::fs::write(store.path_for(hash), b"artifact").unwrap();
    assert!(store.contains(hash));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn eviction_removes_only_unreferenced_artifacts() {
    let dir = tmp_dir("evict");
    let store = ArtifactStore::open(&dir, "pdf").unwrap();
    let kept = ContentHash::of(b"kept");
    let stale = ContentHash::of(b"stale");
    std::fs::write(store.path_for(kept), b"1").unwrap();
    std::fs::write(store.path_for(stale), b"2").unwrap();
    std::fs::write(dir.join("queries.json"), b"{}").unwrap();
    std::fs::write(dir.join("slide-0-1.svg"), b"<svg/>").unwrap();

    assert_eq!(store.cached().unwrap(), BTreeSet::from([kept, stale]));
    let removed = store.evict_except(&BTreeSet::from([kept])).unwrap();

    assert_eq!(removed, 1);
    assert!(store.contains(kept));
    assert!(!store.contains(stale));
    assert!(dir.join("queries.json").exists());
    assert!(dir.join("slide-0-1.svg").exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn eviction_sweeps_partial_outputs() {
    let dir = tmp_dir("partial");
    let store = ArtifactStore::open(&dir, "pdf").unwrap();
    let kept = ContentHash::of(b"kept");
    let interrupted = ContentHash::of(b"interrupted");
    std::fs::write(store.path_for(kept), b"1").unwrap();
    std::fs::write(store.partial_path_for(kept), b"half").unwrap();
    std::fs::write(store.partial_path_for(interrupted), b"half").unwrap();
    assert_eq!(
        store.partial_path_for(kept),
        dir.join(format!("{}.partial.pdf", kept.to_hex()))
    );

    assert_eq!(store.cached().unwrap(), BTreeSet::from([kept]));
    let removed = store.evict_except(&BTreeSet::from([kept])).unwrap();

    assert_eq!(removed, 2);
    assert!(store.contains(kept));
    assert!(!store.partial_path_for(kept).exists());
    assert!(!store.partial_path_for(interrupted).exists());
    let _ = std::fs::remove_dir_all(&dir);
}
