use super::*;

#[test]
fn defaults() {
    let opts = DeckOpts::default();
    assert_eq!((opts.width, opts.height), (1024, 768));
    assert_eq!(opts.cache_dir, PathBuf::from("./stepdeck-cache"));
    assert!(!opts.debug);
    assert_eq!(opts.threads, None);
    assert_eq!(
        DeckOpts::new("out.pdf").query_cache_path(),
        PathBuf::from("./stepdeck-cache").join("queries.json")
    );
}

#[test]
fn zero_threads_and_empty_pages_are_rejected() {
    let opts = DeckOpts {
        threads: Some(0),
        ..DeckOpts::default()
    };
    assert!(matches!(opts.validate(), Err(DeckError::Construction(_))));
    assert!(opts.build_thread_pool().is_err());

    let opts = DeckOpts {
        width: 0,
        ..DeckOpts::default()
    };
    assert!(matches!(opts.validate(), Err(DeckError::Construction(_))));
}

#[test]
fn explicit_thread_count_is_honoured() {
    let opts = DeckOpts {
        threads: Some(2),
        ..DeckOpts::default()
    };
    assert_eq!(opts.build_thread_pool().unwrap().current_num_threads(), 2);
}
