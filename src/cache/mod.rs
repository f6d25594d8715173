//! Build caches persisted in the deck's cache directory.

/// Content-addressed page artifacts.
pub mod artifacts;
/// Measurement query cache.
pub mod query;
