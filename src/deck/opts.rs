use std::path::PathBuf;

use crate::foundation::error::{DeckError, DeckResult};

/// Default page width in pixels.
pub const DEFAULT_PAGE_WIDTH: u32 = 1024;
/// Default page height in pixels.
pub const DEFAULT_PAGE_HEIGHT: u32 = 768;
/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "./stepdeck-cache";
/// File name of the persisted query cache inside the cache directory.
pub const QUERY_CACHE_FILE: &str = "queries.json";

/// Options of a deck build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckOpts {
    /// Final document path handed to the assembler.
    pub output: PathBuf,
    /// Page width in pixels.
    pub width: u32,
    /// Page height in pixels.
    pub height: u32,
    /// Directory holding the query cache and page artifacts.
    pub cache_dir: PathBuf,
    /// Also write every page as SVG and keep stale artifacts.
    pub debug: bool,
    /// Worker threads; `None` uses the available parallelism.
    pub threads: Option<usize>,
}

impl Default for DeckOpts {
    fn default() -> Self {
        Self {
            output: PathBuf::from("slides.pdf"),
            width: DEFAULT_PAGE_WIDTH,
            height: DEFAULT_PAGE_HEIGHT,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            debug: false,
            threads: None,
        }
    }
}

impl DeckOpts {
    /// Default options writing to `output`.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    /// Path of the persisted query cache.
    pub fn query_cache_path(&self) -> PathBuf {
        self.cache_dir.join(QUERY_CACHE_FILE)
    }

    /// Reject options no build can use.
    pub fn validate(&self) -> DeckResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DeckError::construction(format!(
                "page size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.threads == Some(0) {
            return Err(DeckError::construction("'threads' must be >= 1 when set"));
        }
        Ok(())
    }

    pub(crate) fn build_thread_pool(&self) -> DeckResult<rayon::ThreadPool> {
        self.validate()?;
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = self.threads {
            builder = builder.num_threads(n);
        }
        builder.build().map_err(|e| {
            DeckError::construction(format!("failed to build rayon thread pool: {e}"))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/opts.rs"]
mod tests;
