//! The slide element tree and its builder API.

/// Boxes, lists, frames, columns, separators and spaces.
pub mod container;
/// External SVG images with step annotations.
pub mod image;
/// The node enum, shared node state and the custom element seam.
pub mod node;
/// Text, code and shell blocks with line emphasis.
pub mod text;
