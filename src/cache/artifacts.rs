use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use xxhash_rust::xxh3::Xxh3;

use crate::foundation::error::DeckResult;

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;
const PARTIAL_TAG: &str = "partial";

/// Content address of a serialized page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash {
    hi: u64,
    lo: u64,
}

impl ContentHash {
    /// Stable 128-bit hash of `bytes`.
    pub fn of(bytes: &[u8]) -> Self {
        let mut h = Xxh3::with_seed(XXH3_SEED);
        h.update(bytes);
        let v = h.digest128();
        Self {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }

    /// 32 lowercase hex digits.
    pub fn to_hex(self) -> String {
        format!("{:016x}{:016x}", self.hi, self.lo)
    }

    fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self {
            hi: u64::from_str_radix(&s[..16], 16).ok()?,
            lo: u64::from_str_radix(&s[16..], 16).ok()?,
        })
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Directory of composited pages named `<hash>.<extension>`.
///
/// Writers never contend: each destination path is owned by exactly one content hash.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    extension: String,
}

impl ArtifactStore {
    /// Open (and create if needed) a store for artifacts with `extension`.
    pub fn open(dir: impl Into<PathBuf>, extension: &str) -> DeckResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create cache directory '{}'", dir.display()))?;
        Ok(Self {
            dir,
            extension: extension.trim_start_matches('.').to_string(),
        })
    }

    /// Store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Artifact file extension, without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path of the artifact for `hash`, whether or not it exists.
    pub fn path_for(&self, hash: ContentHash) -> PathBuf {
        self.dir.join(format!("{}.{}", hash.to_hex(), self.extension))
    }

    /// Scratch path a compositor writes to before the result is renamed into place.
    pub fn partial_path_for(&self, hash: ContentHash) -> PathBuf {
        self.dir.join(format!("{}.{PARTIAL_TAG}.{}", hash.to_hex(), self.extension))
    }

    /// Whether the artifact for `hash` is already on disk.
    pub fn contains(&self, hash: ContentHash) -> bool {
        self.path_for(hash).is_file()
    }

    /// Hashes of every artifact currently on disk. Files not named like artifacts are ignored.
    pub fn cached(&self) -> DeckResult<BTreeSet<ContentHash>> {
        Ok(self.scan()?.artifacts)
    }

    /// Delete every artifact not in `keep`, plus partial outputs left behind by interrupted
    /// builds. Removal failures are logged and skipped. Returns the number of deleted files.
    pub fn evict_except(&self, keep: &BTreeSet<ContentHash>) -> DeckResult<usize> {
        let scan = self.scan()?;
        let stale = scan
            .artifacts
            .difference(keep)
            .map(|hash| (self.path_for(*hash), "stale artifact"));
        let partial = scan
            .partials
            .iter()
            .map(|hash| (self.partial_path_for(*hash), "partial artifact"));

        let mut removed = 0;
        for (path, kind) in stale.chain(partial) {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), kind, "evicted");
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), kind, error = %e, "failed to evict");
                }
            }
        }
        Ok(removed)
    }

    fn scan(&self) -> DeckResult<Scan> {
        let rd = std::fs::read_dir(&self.dir)
            .with_context(|| format!("failed to list cache directory '{}'", self.dir.display()))?;
        let mut scan = Scan::default();
        for entry in rd.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match stem.split_once('.') {
                None => scan.artifacts.extend(ContentHash::from_hex(stem)),
                Some((hex, PARTIAL_TAG)) => scan.partials.extend(ContentHash::from_hex(hex)),
                Some(_) => {}
            }
        }
        Ok(scan)
    }
}

#[derive(Default)]
struct Scan {
    artifacts: BTreeSet<ContentHash>,
    partials: BTreeSet<ContentHash>,
}

#[cfg(test)]
#[path = "../../tests/unit/cache/artifacts.rs"]
mod tests;
