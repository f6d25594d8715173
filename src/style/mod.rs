//! Text styles and themes.

/// Sparse text style records and the merge rule.
pub mod text_style;
/// Themes: palette, metrics and named styles.
pub mod theme;
