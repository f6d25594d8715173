//! The slide document and its build.

/// Build options.
pub mod opts;
/// The build pipeline.
pub mod pipeline;
/// Slides and the deck document.
pub mod slides;
