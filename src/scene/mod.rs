//! SVG serialization: page drawing and external scene graphs.

/// Step-annotated external SVG.
pub mod annotated;
/// Page draw primitives.
pub mod canvas;
/// Minimal XML writer.
pub mod writer;
