//! Geometry, visibility ranges and the error type.

/// Geometry, steps and visibility ranges.
pub mod core;
/// Crate error type.
pub mod error;
