/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    /// Anchor at the left edge.
    Left,
    /// Anchor at the center.
    Center,
    /// Anchor at the right edge.
    Right,
}

/// Sparse text style record. Every attribute is independently optional.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    /// Font family name.
    pub font: Option<String>,
    /// Font size in pixels.
    pub size: Option<f64>,
    /// Horizontal alignment.
    pub align: Option<Align>,
    /// Line height as a multiple of the font size.
    pub line_spacing: Option<f64>,
    /// Fill color, any SVG color string.
    pub color: Option<String>,
    /// Bold weight.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,
}

/// Size used when no style in a cascade defines one.
pub const FALLBACK_FONT_SIZE: f64 = 30.0;
/// Line spacing used when no style in a cascade defines one.
pub const FALLBACK_LINE_SPACING: f64 = 1.1;

impl TextStyle {
    /// Empty style (all attributes unset).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font family.
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Set the font size.
    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the alignment.
    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Set the line spacing factor.
    pub fn line_spacing(mut self, line_spacing: f64) -> Self {
        self.line_spacing = Some(line_spacing);
        self
    }

    /// Set the fill color.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set bold weight.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Set italic style.
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Font size, falling back to [`FALLBACK_FONT_SIZE`].
    pub fn font_size(&self) -> f64 {
        self.size.unwrap_or(FALLBACK_FONT_SIZE)
    }

    /// Distance between baselines in pixels.
    pub fn line_height(&self) -> f64 {
        self.font_size() * self.line_spacing.unwrap_or(FALLBACK_LINE_SPACING)
    }

    /// Alignment, falling back to [`Align::Left`].
    pub fn alignment(&self) -> Align {
        self.align.unwrap_or(Align::Left)
    }

    /// Margin added around measured text on each axis: a quarter of the size horizontally, a
    /// sixth vertically.
    pub fn text_offset(&self) -> (f64, f64) {
        let size = self.font_size();
        (size / 4.0, size / 6.0)
    }
}

/// Merge styles ordered from lowest to highest priority.
///
/// For every attribute the last style that defines it wins; unset attributes fall through to
/// earlier entries.
pub fn merge_styles<'a, I>(styles: I) -> TextStyle
where
    I: IntoIterator<Item = &'a TextStyle>,
{
    let mut out = TextStyle::default();
    for s in styles {
        if s.font.is_some() {
            out.font.clone_from(&s.font);
        }
        if s.size.is_some() {
            out.size = s.size;
        }
        if s.align.is_some() {
            out.align = s.align;
        }
        if s.line_spacing.is_some() {
            out.line_spacing = s.line_spacing;
        }
        if s.color.is_some() {
            out.color.clone_from(&s.color);
        }
        if s.bold.is_some() {
            out.bold = s.bold;
        }
        if s.italic.is_some() {
            out.italic = s.italic;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/style/text_style.rs"]
mod tests;
