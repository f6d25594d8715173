use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{DeckError, DeckResult};
use crate::tools::measure::{build_fontdb, svg_options};
use crate::tools::process::{ToolCommand, run_tool};

/// Converts one serialized page into a binary page artifact.
pub trait PageCompositor: Send + Sync {
    /// File extension of produced artifacts, without the dot.
    fn extension(&self) -> &str;

    /// Write the artifact for `svg` to `output`.
    fn composite(&self, svg: &str, output: &Path) -> DeckResult<()>;
}

/// Merges ordered page artifacts into the final document.
pub trait DocumentAssembler: Send + Sync {
    /// Assemble `pages` (slide order, then step order) into `output`.
    fn assemble(&self, pages: &[PathBuf], output: &Path) -> DeckResult<()>;
}

/// In-process compositor: `usvg` + `resvg` rasterization to PNG.
#[derive(Clone, Debug)]
pub struct ResvgCompositor {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgCompositor {
    /// Compositor using system fonts.
    pub fn new() -> Self {
        Self::from_fontdb(build_fontdb(&[] as &[&Path]))
    }

    /// Compositor over an existing font database (share it with the measurer).
    pub fn from_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }
}

impl Default for ResvgCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCompositor for ResvgCompositor {
    fn extension(&self) -> &str {
        "png"
    }

    fn composite(&self, svg: &str, output: &Path) -> DeckResult<()> {
        let opts = svg_options(&self.fontdb);
        let tree = usvg::Tree::from_str(svg, &opts).context("parse page svg")?;
        let size = tree.size().to_int_size();
        let (width, height) = (size.width(), size.height());

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| DeckError::external_tool("resvg", "failed to allocate page pixmap"))?;
        resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let mut data = pixmap.take();
        demultiply_rgba8(&mut data);
        let img = image::RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| DeckError::external_tool("resvg", "page buffer size mismatch"))?;
        img.save_with_format(output, image::ImageFormat::Png)
            .with_context(|| format!("write page image '{}'", output.display()))?;
        Ok(())
    }
}

fn demultiply_rgba8(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Subprocess compositor, by default `inkscape` exporting PDF from stdin.
#[derive(Clone, Debug)]
pub struct InkscapeCompositor {
    command: ToolCommand,
    extension: String,
}

impl InkscapeCompositor {
    /// Default `inkscape` PDF export.
    pub fn new() -> Self {
        Self::with_command(
            ToolCommand::new(
                "inkscape",
                ["--pipe", "--export-type=pdf", "--export-filename={output}"],
            ),
            "pdf",
        )
    }

    /// Custom invocation. The page arrives on stdin; `{output}` names the artifact to write.
    pub fn with_command(command: ToolCommand, extension: &str) -> Self {
        Self {
            command,
            extension: extension.to_string(),
        }
    }
}

impl Default for InkscapeCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCompositor for InkscapeCompositor {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn composite(&self, svg: &str, output: &Path) -> DeckResult<()> {
        let output = output.to_string_lossy();
        run_tool(&self.command, &[("output", &output)], Some(svg.as_bytes()))?;
        Ok(())
    }
}

/// Concatenation through an external tool, by default `pdftk <pages> cat output <output>`.
///
/// An argument that is exactly `{inputs}` expands to all page paths.
#[derive(Clone, Debug)]
pub struct PdftkAssembler {
    command: ToolCommand,
}

impl PdftkAssembler {
    /// Default `pdftk` invocation.
    pub fn new() -> Self {
        Self::with_command(ToolCommand::new(
            "pdftk",
            ["{inputs}", "cat", "output", "{output}"],
        ))
    }

    /// Custom invocation.
    pub fn with_command(command: ToolCommand) -> Self {
        Self { command }
    }
}

impl Default for PdftkAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAssembler for PdftkAssembler {
    fn assemble(&self, pages: &[PathBuf], output: &Path) -> DeckResult<()> {
        let mut args = Vec::with_capacity(self.command.args.len() + pages.len());
        for arg in &self.command.args {
            if arg == "{inputs}" {
                args.extend(pages.iter().map(|p| p.to_string_lossy().into_owned()));
            } else {
                args.push(arg.clone());
            }
        }
        let command = ToolCommand {
            args,
            ..self.command.clone()
        };
        let output = output.to_string_lossy();
        run_tool(&command, &[("output", &output)], None)?;
        Ok(())
    }
}

/// Copies pages into a directory as `page-0001.<ext>`, `page-0002.<ext>`, ...
///
/// Numbered page files from an earlier, longer (or differently typed) deck are removed. Other
/// files in the directory are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectoryAssembler;

impl DirectoryAssembler {
    fn page_name(idx: usize, page: &Path) -> String {
        let ext = page.extension().and_then(|e| e.to_str()).unwrap_or("page");
        format!("page-{:04}.{ext}", idx + 1)
    }

    /// Whether `name` has the `page-<digits>.<ext>` shape this assembler writes.
    fn is_numbered_page(name: &str) -> bool {
        let Some(rest) = name.strip_prefix("page-") else {
            return false;
        };
        let Some((digits, ext)) = rest.split_once('.') else {
            return false;
        };
        digits.len() >= 4 && digits.bytes().all(|b| b.is_ascii_digit()) && !ext.is_empty()
    }
}

impl DocumentAssembler for DirectoryAssembler {
    fn assemble(&self, pages: &[PathBuf], output: &Path) -> DeckResult<()> {
        std::fs::create_dir_all(output)
            .with_context(|| format!("failed to create output directory '{}'", output.display()))?;

        let names: Vec<String> = pages
            .iter()
            .enumerate()
            .map(|(idx, page)| Self::page_name(idx, page))
            .collect();

        let rd = std::fs::read_dir(output)
            .with_context(|| format!("failed to list output directory '{}'", output.display()))?;
        for entry in rd.flatten() {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !Self::is_numbered_page(&name) || names.contains(&name) {
                continue;
            }
            let path = entry.path();
            if path.is_file() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("failed to remove '{}'", path.display()))?;
                tracing::debug!(path = %path.display(), "removed stale page");
            }
        }

        for (page, name) in pages.iter().zip(&names) {
            let dst = output.join(name);
            std::fs::copy(page, &dst).with_context(|| {
                format!("failed to copy '{}' to '{}'", page.display(), dst.display())
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/composite.rs"]
mod tests;
