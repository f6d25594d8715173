//! Token streams: the markup parser and the highlighter seam.

/// Code highlighting.
pub mod highlight;
/// Annotated-string markup.
pub mod markup;
