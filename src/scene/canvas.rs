use crate::foundation::core::Rect;
use crate::foundation::error::{DeckError, DeckResult};
use crate::scene::writer::XmlWriter;
use crate::style::text_style::{Align, TextStyle};
use crate::style::theme::StyleTable;
use crate::text::markup::Token;

/// SVG namespace written on every root element.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Element id of the text run inside a measurement document.
pub const MEASURE_ID: &str = "t1";

/// Fill/stroke parameters for [`PageCanvas::draw_rect_with`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RectPaint<'a> {
    /// Fill color.
    pub fill: Option<&'a str>,
    /// Stroke color.
    pub stroke: Option<&'a str>,
    /// Stroke width.
    pub stroke_width: Option<f64>,
    /// Corner radius on the x axis.
    pub rx: Option<f64>,
    /// Corner radius on the y axis.
    pub ry: Option<f64>,
}

/// One page being drawn, serialized as an SVG document.
#[derive(Debug)]
pub struct PageCanvas {
    width: u32,
    height: u32,
    xml: XmlWriter,
}

impl PageCanvas {
    /// Start a page of the given pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        let mut xml = XmlWriter::new();
        xml.element("svg");
        xml.set("xmlns", SVG_NS);
        xml.set("width", width);
        xml.set("height", height);
        Self { width, height, xml }
    }

    /// Page width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Page height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Filled rectangle.
    pub fn draw_rect(&mut self, rect: Rect, fill: &str) {
        self.draw_rect_with(
            rect,
            &RectPaint {
                fill: Some(fill),
                ..RectPaint::default()
            },
        );
    }

    /// Rectangle with explicit paint. With neither fill nor stroke it is stroked black.
    pub fn draw_rect_with(&mut self, rect: Rect, paint: &RectPaint<'_>) {
        let xml = &mut self.xml;
        xml.element("rect");
        xml.set("x", rect.x);
        xml.set("y", rect.y);
        if let Some(rx) = paint.rx {
            xml.set("rx", rx);
        }
        if let Some(ry) = paint.ry {
            xml.set("ry", ry);
        }
        xml.set("width", rect.width);
        xml.set("height", rect.height);

        let stroke = match (paint.fill, paint.stroke) {
            (None, None) => Some("black"),
            (_, stroke) => stroke,
        };
        let mut style = Vec::new();
        if let Some(fill) = paint.fill {
            style.push(format!("fill:{fill}"));
        }
        if let Some(stroke) = stroke {
            style.push(format!("stroke:{stroke}"));
        }
        if let Some(w) = paint.stroke_width {
            style.push(format!("stroke-width:{w}"));
        }
        xml.set("style", style.join(";"));
        xml.close();
    }

    /// Styled text whose first baseline is at `y`.
    pub fn draw_text(
        &mut self,
        x: f64,
        y: f64,
        tokens: &[Token],
        style: &TextStyle,
        styles: &StyleTable,
    ) -> DeckResult<()> {
        write_text(&mut self.xml, x, y, tokens, style, styles, None)
    }

    /// Embed an external SVG fragment translated to `(x, y)` and optionally scaled.
    pub fn draw_image(&mut self, svg_markup: &str, x: f64, y: f64, scale: Option<f64>) {
        let mut transform = format!("translate({x}, {y})");
        if let Some(s) = scale
            && s != 1.0
        {
            transform.push_str(&format!(" scale({s})"));
        }
        self.xml.element("g");
        self.xml.set("transform", transform);
        self.xml.raw(svg_markup);
        self.xml.close();
    }

    /// Close the page and return its canonical serialized form.
    pub fn finish(self) -> DeckResult<String> {
        self.xml.finish()
    }
}

/// Standalone SVG document containing only the given text run (id [`MEASURE_ID`]).
///
/// The document is a pure function of style, style table and tokens, so it doubles as the
/// measurement cache key.
pub fn text_measure_svg(
    tokens: &[Token],
    style: &TextStyle,
    styles: &StyleTable,
) -> DeckResult<String> {
    let mut xml = XmlWriter::new();
    xml.element("svg");
    xml.set("xmlns", SVG_NS);
    write_text(&mut xml, 0.0, 0.0, tokens, style, styles, Some(MEASURE_ID))?;
    xml.finish()
}

fn write_text(
    xml: &mut XmlWriter,
    x: f64,
    y: f64,
    tokens: &[Token],
    style: &TextStyle,
    styles: &StyleTable,
    id: Option<&str>,
) -> DeckResult<()> {
    xml.element("text");
    if let Some(id) = id {
        xml.set("id", id);
    }
    xml.set("x", x);
    xml.set("y", y);
    xml.set(
        "text-anchor",
        match style.alignment() {
            Align::Left => "start",
            Align::Center => "middle",
            Align::Right => "end",
        },
    );
    set_font(xml, style);

    let line_size = style.line_height();
    let mut active = vec![style];
    xml.element("tspan");
    for token in tokens {
        match token {
            Token::Text(t) => xml.text(t),
            Token::Newline(n) => {
                for _ in &active {
                    xml.close();
                }
                for (idx, s) in active.iter().enumerate() {
                    xml.element("tspan");
                    xml.set("xml:space", "preserve");
                    if idx == 0 {
                        xml.set("x", x);
                        xml.set("dy", line_size * f64::from(*n));
                    }
                    set_font(xml, s);
                }
            }
            Token::Begin(name) => {
                let s = styles.get(name).ok_or_else(|| {
                    DeckError::construction(format!("unknown text style '{name}'"))
                })?;
                active.push(s);
                xml.element("tspan");
                xml.set("xml:space", "preserve");
                set_font(xml, s);
            }
            Token::End => {
                if active.len() > 1 {
                    active.pop();
                    xml.close();
                }
            }
        }
    }
    for _ in &active {
        xml.close();
    }
    xml.close();
    Ok(())
}

fn set_font(xml: &mut XmlWriter, style: &TextStyle) {
    if let Some(font) = &style.font {
        xml.set("font-family", font);
    }
    if let Some(size) = style.size {
        xml.set("font-size", size);
    }
    let mut s = String::new();
    if let Some(color) = &style.color {
        s.push_str(&format!("fill:{color};"));
    }
    if style.bold == Some(true) {
        s.push_str("font-weight:bold;");
    }
    if style.italic == Some(true) {
        s.push_str("font-style:italic;");
    }
    if !s.is_empty() {
        xml.set("style", s);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/canvas.rs"]
mod tests;
