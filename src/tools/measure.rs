use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{DeckError, DeckResult};
use crate::tools::process::{ToolCommand, run_tool};

/// External measurement source for text runs.
///
/// Given a standalone SVG document, returns the rendered width of the element with `element_id`.
/// Implementations must be deterministic for identical input; the query cache relies on it.
pub trait TextMeasurer: Send + Sync {
    /// Width in pixels of element `element_id` in `svg`.
    fn text_width(&self, svg: &str, element_id: &str) -> DeckResult<f64>;
}

/// In-process measurement with `usvg` text layout.
#[derive(Clone, Debug)]
pub struct UsvgMeasurer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl UsvgMeasurer {
    /// Measurer using system fonts.
    pub fn new() -> Self {
        Self::with_font_dirs(&[] as &[&Path])
    }

    /// Measurer using system fonts plus every `.ttf`/`.otf`/`.ttc` file in `dirs`.
    pub fn with_font_dirs<P: AsRef<Path>>(dirs: &[P]) -> Self {
        Self {
            fontdb: build_fontdb(dirs),
        }
    }

    /// Measurer over an existing font database.
    pub fn from_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// The font database, shareable with the in-process compositor.
    pub fn fontdb(&self) -> &Arc<usvg::fontdb::Database> {
        &self.fontdb
    }
}

impl Default for UsvgMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for UsvgMeasurer {
    fn text_width(&self, svg: &str, element_id: &str) -> DeckResult<f64> {
        if self.fontdb.is_empty() {
            return Err(DeckError::external_tool(
                "usvg",
                "no fonts available for text measurement",
            ));
        }
        let opts = svg_options(&self.fontdb);
        let tree = usvg::Tree::from_str(svg, &opts).context("parse measurement svg")?;
        // Whitespace-only runs produce no glyphs and therefore no node.
        let Some(node) = tree.node_by_id(element_id) else {
            tracing::debug!(element_id, "measured element has no glyphs");
            return Ok(0.0);
        };
        Ok(f64::from(node.bounding_box().width()))
    }
}

/// Measurement through `inkscape --query-width`, reading the SVG from stdin.
#[derive(Clone, Debug)]
pub struct InkscapeMeasurer {
    command: ToolCommand,
}

impl InkscapeMeasurer {
    /// Default `inkscape` invocation.
    pub fn new() -> Self {
        Self::with_command(ToolCommand::new(
            "inkscape",
            ["--pipe", "--query-id={id}", "--query-width"],
        ))
    }

    /// Custom invocation. `{id}` is replaced by the element id; the document arrives on stdin and
    /// the width is expected on stdout.
    pub fn with_command(command: ToolCommand) -> Self {
        Self { command }
    }
}

impl Default for InkscapeMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for InkscapeMeasurer {
    fn text_width(&self, svg: &str, element_id: &str) -> DeckResult<f64> {
        let vars = [("id", element_id)];
        let out = run_tool(&self.command, &vars, Some(svg.as_bytes()))?;
        let text = String::from_utf8_lossy(&out);
        text.trim().parse::<f64>().map_err(|_| {
            DeckError::external_tool(
                self.command.describe(&vars),
                format!("unparseable width output '{}'", text.trim()),
            )
        })
    }
}

/// System fonts plus fonts found inside `dirs`, searched recursively.
pub(crate) fn build_fontdb<P: AsRef<Path>>(dirs: &[P]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    for dir in dirs {
        let dir = dir.as_ref();
        let loaded = load_fonts_from_dir(&mut db, dir);
        tracing::debug!(dir = %dir.display(), files = loaded, "loaded deck fonts");
    }
    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
}

/// Load every font file under `dir` and return how many were read. Symlinked directories are
/// not followed.
fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) -> usize {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return 0;
    };

    let mut loaded = 0;
    for entry in rd.flatten() {
        let path = entry.path();
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            loaded += load_fonts_from_dir(db, &path);
            continue;
        }
        if !is_font_file(&path) {
            continue;
        }
        match db.load_font_file(&path) {
            Ok(()) => loaded += 1,
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping font file"),
        }
    }
    loaded
}

/// Parse options sharing `fontdb`. Unknown families fall back to generic ones, then to any face,
/// so measurement and compositing agree on the font actually used.
pub(crate) fn svg_options(fontdb: &Arc<usvg::fontdb::Database>) -> usvg::Options<'static> {
    usvg::Options {
        fontdb: Arc::clone(fontdb),
        font_resolver: font_resolver(),
        ..Default::default()
    }
}

/// Query order for a text run's `font-family` list.
///
/// The requested families come first. Deck themes name concrete families such as `Ubuntu Mono`;
/// when the first named family looks monospaced, the monospace generic is tried before the
/// proportional ones so code keeps a fixed advance on machines without the theme fonts.
fn query_families(requested: &[usvg::FontFamily]) -> Vec<usvg::fontdb::Family<'_>> {
    use usvg::fontdb::Family;

    let mut families: Vec<Family<'_>> = requested
        .iter()
        .map(|family| match family {
            usvg::FontFamily::Serif => Family::Serif,
            usvg::FontFamily::SansSerif => Family::SansSerif,
            usvg::FontFamily::Cursive => Family::Cursive,
            usvg::FontFamily::Fantasy => Family::Fantasy,
            usvg::FontFamily::Monospace => Family::Monospace,
            usvg::FontFamily::Named(s) => Family::Name(s),
        })
        .collect();

    let monospaced = requested.iter().find_map(|f| match f {
        usvg::FontFamily::Named(s) => Some(looks_monospaced(s)),
        usvg::FontFamily::Monospace => Some(true),
        _ => None,
    });
    let generics: &[Family<'static>] = if monospaced == Some(true) {
        &[Family::Monospace, Family::SansSerif, Family::Serif]
    } else {
        &[Family::SansSerif, Family::Serif, Family::Monospace]
    };
    for generic in generics {
        if !families.contains(generic) {
            families.push(*generic);
        }
    }
    families
}

fn looks_monospaced(family: &str) -> bool {
    let lower = family.to_ascii_lowercase();
    ["mono", "code", "courier", "consol"]
        .iter()
        .any(|hint| lower.contains(hint))
}

fn stretch(stretch: usvg::FontStretch) -> usvg::fontdb::Stretch {
    use usvg::fontdb::Stretch;

    match stretch {
        usvg::FontStretch::UltraCondensed => Stretch::UltraCondensed,
        usvg::FontStretch::ExtraCondensed => Stretch::ExtraCondensed,
        usvg::FontStretch::Condensed => Stretch::Condensed,
        usvg::FontStretch::SemiCondensed => Stretch::SemiCondensed,
        usvg::FontStretch::Normal => Stretch::Normal,
        usvg::FontStretch::SemiExpanded => Stretch::SemiExpanded,
        usvg::FontStretch::Expanded => Stretch::Expanded,
        usvg::FontStretch::ExtraExpanded => Stretch::ExtraExpanded,
        usvg::FontStretch::UltraExpanded => Stretch::UltraExpanded,
    }
}

fn font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let families = query_families(font.families());
            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };
            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: stretch(font.stretch()),
                style,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            let first = fontdb.faces().next().map(|f| f.id);
            if first.is_some() {
                tracing::debug!(families = ?families, "no matching face, using the first loaded");
            }
            first
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/measure.rs"]
mod tests;
