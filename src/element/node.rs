use std::fmt;

use crate::cache::query::Query;
use crate::element::container::{
    BoxNode, ColumnsNode, FrameNode, ListNode, SeparatorNode, SpaceNode,
};
use crate::element::image::ImageNode;
use crate::element::text::TextBlock;
use crate::foundation::core::{IntoShowRange, Rect, ShowRange, SizeRequest, Step};
use crate::foundation::error::DeckResult;
use crate::layout::context::{Ancestor, LayoutCtx};
use crate::scene::canvas::PageCanvas;
use crate::style::text_style::TextStyle;

/// State shared by every node: visibility and explicit style override.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeBase {
    pub(crate) show: ShowRange,
    pub(crate) style: Option<TextStyle>,
}

impl NodeBase {
    /// Base with a given visibility range.
    pub fn with_show(show: ShowRange) -> Self {
        Self { show, style: None }
    }

    /// Visibility range.
    pub fn show_range(&self) -> ShowRange {
        self.show
    }

    /// Explicit style override.
    pub fn style_override(&self) -> Option<&TextStyle> {
        self.style.as_ref()
    }
}

/// Builder operations available on every configurable node.
pub trait Element {
    /// Shared node state.
    fn base(&self) -> &NodeBase;

    /// Shared node state, mutable.
    fn base_mut(&mut self) -> &mut NodeBase;

    /// Restrict visibility to a step range (`2`, `(2, 4)`, `2..=4`, `2..`).
    fn show(&mut self, show: impl IntoShowRange) -> DeckResult<&mut Self>
    where
        Self: Sized,
    {
        self.base_mut().show = show.into_show_range()?;
        Ok(self)
    }

    /// Set the explicit style override; it wins over every cascaded style.
    fn style(&mut self, style: TextStyle) -> &mut Self
    where
        Self: Sized,
    {
        self.base_mut().style = Some(style);
        self
    }

    /// Whether the node is visible at `step`.
    fn is_visible(&self, step: Step) -> bool {
        self.base().show.contains(step)
    }
}

/// User-defined leaf element.
///
/// The node hosting it owns visibility and the style override; the element only sizes and draws
/// itself.
pub trait CustomElement: Send + Sync + fmt::Debug {
    /// Natural size and fill flags.
    fn size_request(&self, ctx: &LayoutCtx<'_>) -> DeckResult<SizeRequest>;

    /// Draw into `rect`. Called only when visible.
    fn render_body(
        &self,
        ctx: &LayoutCtx<'_>,
        canvas: &mut PageCanvas,
        rect: Rect,
    ) -> DeckResult<()>;

    /// Largest step the element animates to.
    fn max_step(&self) -> Step {
        1
    }

    /// Measurement queries needed by `size_request`/`render_body`.
    fn emit_queries(&self, _ctx: &LayoutCtx<'_>, _out: &mut Vec<Query>) -> DeckResult<()> {
        Ok(())
    }
}

/// Node wrapping a [`CustomElement`].
#[derive(Debug)]
pub struct CustomNode {
    pub(crate) base: NodeBase,
    pub(crate) element: Box<dyn CustomElement>,
}

impl CustomNode {
    /// The hosted element.
    pub fn element(&self) -> &dyn CustomElement {
        self.element.as_ref()
    }
}

impl Element for CustomNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

/// One node of a slide's element tree.
#[derive(Debug)]
pub enum Node {
    /// Styled text.
    Text(TextBlock),
    /// Highlighted source code on a background.
    Code(TextBlock),
    /// Shell session on a dark background.
    Shell(TextBlock),
    /// External SVG scene graph.
    Image(ImageNode),
    /// Vertical stack(s) of children.
    Box(BoxNode),
    /// Bulleted list of item boxes.
    List(ListNode),
    /// Titled frame around a body box.
    Frame(FrameNode),
    /// Horizontal row of columns.
    Columns(ColumnsNode),
    /// Horizontal or vertical rule.
    Separator(SeparatorNode),
    /// Fixed empty space.
    Space(SpaceNode),
    /// User-defined leaf.
    Custom(CustomNode),
}

impl Node {
    /// Shared node state.
    pub fn base(&self) -> &NodeBase {
        match self {
            Node::Text(n) | Node::Code(n) | Node::Shell(n) => n.base(),
            Node::Image(n) => n.base(),
            Node::Box(n) => n.base(),
            Node::List(n) => n.base(),
            Node::Frame(n) => n.base(),
            Node::Columns(n) => n.base(),
            Node::Separator(n) => n.base(),
            Node::Space(n) => n.base(),
            Node::Custom(n) => n.base(),
        }
    }

    /// Whether the node is visible at `step`.
    pub fn is_visible(&self, step: Step) -> bool {
        self.base().show.contains(step)
    }

    /// Largest step at which this subtree changes: the maximum of the node's own range end (or
    /// start when unbounded) and every descendant's, emphasis ranges included.
    pub fn max_step(&self) -> Step {
        let own = self.base().show.last_step();
        let inner = match self {
            Node::Text(n) | Node::Code(n) | Node::Shell(n) => n.emphasis_max_step(),
            Node::Image(n) => n.max_step(),
            Node::Box(n) => return n.max_step(),
            Node::List(n) => n.items().iter().map(BoxNode::max_step).max().unwrap_or(1),
            Node::Frame(n) => n.body().max_step(),
            Node::Columns(n) => n.columns().iter().map(Node::max_step).max().unwrap_or(1),
            Node::Separator(_) | Node::Space(_) => 1,
            Node::Custom(n) => n.element.max_step(),
        };
        own.max(inner)
    }

    /// Contribution of this node to the style cascade of its descendants.
    pub(crate) fn ancestor(&self) -> Ancestor {
        match self {
            Node::Box(n) => Ancestor::Box(n.role()),
            Node::Frame(_) => Ancestor::Frame,
            _ => Ancestor::Other,
        }
    }

    /// Context for this node's own work: `ctx` extended by the node.
    pub(crate) fn enter<'a>(&'a self, ctx: &LayoutCtx<'a>) -> LayoutCtx<'a> {
        ctx.enter(self.ancestor(), self.base().style.as_ref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/element/node.rs"]
mod tests;
