//! External collaborators: text measurement, page compositing and document assembly.
//!
//! Each concern is a trait with an in-process implementation (`usvg`/`resvg`) and a subprocess
//! implementation (`inkscape`, `pdftk`).

use std::sync::Arc;

/// Page compositing and document assembly.
pub mod composite;
/// Text measurement.
pub mod measure;
/// Subprocess invocation with timeouts.
pub mod process;

use composite::{
    DirectoryAssembler, DocumentAssembler, InkscapeCompositor, PageCompositor, PdftkAssembler,
    ResvgCompositor,
};
use measure::{InkscapeMeasurer, TextMeasurer, UsvgMeasurer};

/// The three collaborators a build needs.
#[derive(Clone)]
pub struct BuildTools {
    /// Resolves text measurement queries.
    pub measurer: Arc<dyn TextMeasurer>,
    /// Turns page SVG into artifacts.
    pub compositor: Arc<dyn PageCompositor>,
    /// Merges artifacts into the output document.
    pub assembler: Arc<dyn DocumentAssembler>,
}

impl BuildTools {
    /// Explicit tool set.
    pub fn new(
        measurer: Arc<dyn TextMeasurer>,
        compositor: Arc<dyn PageCompositor>,
        assembler: Arc<dyn DocumentAssembler>,
    ) -> Self {
        Self {
            measurer,
            compositor,
            assembler,
        }
    }

    /// `usvg` measurement, `resvg` PNG pages, pages copied into the output directory.
    /// Measurer and compositor share one font database.
    pub fn in_process() -> Self {
        let measurer = UsvgMeasurer::new();
        let compositor = ResvgCompositor::from_fontdb(Arc::clone(measurer.fontdb()));
        Self::new(
            Arc::new(measurer),
            Arc::new(compositor),
            Arc::new(DirectoryAssembler),
        )
    }

    /// `inkscape` measurement and PDF pages, `pdftk` concatenation.
    pub fn inkscape() -> Self {
        Self::new(
            Arc::new(InkscapeMeasurer::new()),
            Arc::new(InkscapeCompositor::new()),
            Arc::new(PdftkAssembler::new()),
        )
    }
}

impl std::fmt::Debug for BuildTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildTools")
            .field("extension", &self.compositor.extension())
            .finish_non_exhaustive()
    }
}
