use std::path::{Path, PathBuf};

use crate::element::node::{Element, NodeBase};
use crate::foundation::core::Step;
use crate::foundation::error::{DeckError, DeckResult};
use crate::scene::annotated::SceneGraph;

/// External SVG placed on a slide.
///
/// Step annotations inside the graph count from the node's own start step: inner step 1 is the
/// first step the node is visible.
#[derive(Clone, Debug)]
pub struct ImageNode {
    base: NodeBase,
    path: Option<PathBuf>,
    scale: Option<f64>,
    scene: SceneGraph,
}

impl ImageNode {
    /// Load and parse an SVG file.
    pub fn load(path: impl AsRef<Path>, scale: Option<f64>) -> DeckResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            DeckError::construction(format!("cannot read image '{}': {e}", path.display()))
        })?;
        let mut node = Self::from_svg(&source, scale).map_err(|e| match e {
            DeckError::Construction(msg) => {
                DeckError::construction(format!("image '{}': {msg}", path.display()))
            }
            other => other,
        })?;
        node.path = Some(path.to_path_buf());
        Ok(node)
    }

    /// Parse SVG source held in memory.
    pub fn from_svg(source: &str, scale: Option<f64>) -> DeckResult<Self> {
        if let Some(s) = scale
            && !(s.is_finite() && s > 0.0)
        {
            return Err(DeckError::construction(format!(
                "image scale must be positive, got {s}"
            )));
        }
        Ok(Self {
            base: NodeBase::default(),
            path: None,
            scale,
            scene: SceneGraph::parse(source)?,
        })
    }

    /// Source file, if loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Optional scale factor.
    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    /// Displayed width (intrinsic width times scale).
    pub fn width(&self) -> f64 {
        self.scene.width() * self.scale.unwrap_or(1.0)
    }

    /// Displayed height (intrinsic height times scale).
    pub fn height(&self) -> f64 {
        self.scene.height() * self.scale.unwrap_or(1.0)
    }

    /// The parsed scene graph.
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Last step at which the image changes: the largest inner step shifted by the start step.
    pub fn max_step(&self) -> Step {
        self.scene.max_inner_step() + self.base.show.start() - 1
    }

    /// Inner step corresponding to absolute `step`.
    pub fn inner_step(&self, step: Step) -> Step {
        (step + 1).saturating_sub(self.base.show.start()).max(1)
    }

    /// Scene graph serialized for absolute `step`.
    pub fn markup_at(&self, step: Step) -> DeckResult<String> {
        self.scene.view_at(self.inner_step(step))
    }
}

impl Element for ImageNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

#[cfg(test)]
#[path = "../../tests/unit/element/image.rs"]
mod tests;
