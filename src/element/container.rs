use std::path::Path;

use crate::element::image::ImageNode;
use crate::element::node::{CustomElement, CustomNode, Element, Node, NodeBase};
use crate::element::text::{TextBlock, TextKind};
use crate::foundation::core::Step;
use crate::foundation::error::DeckResult;
use crate::text::highlight::{Highlighter, PlainHighlighter};
use crate::text::markup::{Token, parse_markup};

/// Push `$value` wrapped in `$variant` onto `$vec` and return a mutable reference to the payload.
macro_rules! push_node {
    ($vec:expr, $variant:path, $value:expr) => {{
        let nodes: &mut Vec<Node> = $vec;
        nodes.push($variant($value));
        match nodes.last_mut() {
            Some($variant(inner)) => inner,
            _ => unreachable!("node was just pushed"),
        }
    }};
}

/// Purpose of a box, which decides the styles its descendants inherit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxRole {
    /// Root box of a slide.
    Main,
    /// Box created by a builder call.
    Plain,
    /// Item of a list.
    ListItem,
    /// Column of a columns node.
    Column,
    /// Body of a frame.
    FrameBody,
}

impl BoxRole {
    /// Whether descendants pick up the `list_item` style.
    pub fn cascades_list_item(self) -> bool {
        matches!(self, BoxRole::ListItem | BoxRole::Column)
    }
}

/// Container stacking its children vertically, possibly in several superimposed layers.
#[derive(Debug)]
pub struct BoxNode {
    base: NodeBase,
    role: BoxRole,
    layers: Vec<Vec<Node>>,
}

impl BoxNode {
    /// Empty box with one layer.
    pub fn new(role: BoxRole) -> Self {
        Self {
            base: NodeBase::default(),
            role,
            layers: vec![Vec::new()],
        }
    }

    /// Box role.
    pub fn role(&self) -> BoxRole {
        self.role
    }

    /// Layers in drawing order.
    pub fn layers(&self) -> &[Vec<Node>] {
        &self.layers
    }

    /// All children of all layers.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.layers.iter().flatten()
    }

    /// Largest step of the box and its children.
    pub fn max_step(&self) -> Step {
        self.children()
            .map(Node::max_step)
            .fold(self.base.show.last_step(), Step::max)
    }

    /// Start a new layer; later children are stacked independently on top of earlier layers.
    pub fn new_layer(&mut self) -> &mut Self {
        self.layers.push(Vec::new());
        self
    }

    fn current_layer(&mut self) -> &mut Vec<Node> {
        if self.layers.is_empty() {
            self.layers.push(Vec::new());
        }
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    /// Append a ready-made node to the current layer.
    pub fn add(&mut self, node: Node) -> &mut Node {
        let layer = self.current_layer();
        layer.push(node);
        let last = layer.len() - 1;
        &mut layer[last]
    }

    /// Nested box.
    pub fn add_box(&mut self) -> &mut BoxNode {
        push_node!(self.current_layer(), Node::Box, BoxNode::new(BoxRole::Plain))
    }

    /// Text written in markup (`~name{...}` selects a named style). Surrounding whitespace is
    /// trimmed.
    pub fn text(&mut self, text: &str) -> &mut TextBlock {
        push_node!(self.current_layer(), Node::Text, markup_block(TextKind::Text, text, None))
    }

    /// Text drawn with the named role style on top of the cascade.
    pub fn text_with_role(&mut self, text: &str, role: &str) -> &mut TextBlock {
        push_node!(
            self.current_layer(),
            Node::Text,
            markup_block(TextKind::Text, text, Some(role.to_string()))
        )
    }

    /// First-level heading.
    pub fn h1(&mut self, text: &str) -> &mut TextBlock {
        self.text_with_role(text, "h1")
    }

    /// Second-level heading.
    pub fn h2(&mut self, text: &str) -> &mut TextBlock {
        self.text_with_role(text, "h2")
    }

    /// Third-level heading.
    pub fn h3(&mut self, text: &str) -> &mut TextBlock {
        self.text_with_role(text, "h3")
    }

    /// Code block tokenized by the plain highlighter.
    pub fn code(&mut self, code: &str, language: &str) -> DeckResult<&mut TextBlock> {
        self.code_with(&PlainHighlighter, code, language)
    }

    /// Code block tokenized by `highlighter`.
    pub fn code_with(
        &mut self,
        highlighter: &dyn Highlighter,
        code: &str,
        language: &str,
    ) -> DeckResult<&mut TextBlock> {
        let code = code.trim();
        let tokens = highlighter.highlight(code, language)?;
        let block =
            TextBlock::new(TextKind::Code, code.to_string(), tokens).with_language(language);
        Ok(push_node!(self.current_layer(), Node::Code, block))
    }

    /// Shell session written in markup (`~shell_prompt{$} ~shell_cmd{ls}`).
    pub fn shell(&mut self, text: &str) -> &mut TextBlock {
        push_node!(self.current_layer(), Node::Shell, markup_block(TextKind::Shell, text, None))
    }

    /// SVG image loaded from `path`, optionally scaled.
    pub fn image(
        &mut self,
        path: impl AsRef<Path>,
        scale: Option<f64>,
    ) -> DeckResult<&mut ImageNode> {
        let image = ImageNode::load(path, scale)?;
        Ok(push_node!(self.current_layer(), Node::Image, image))
    }

    /// SVG image from in-memory source.
    pub fn image_svg(&mut self, source: &str, scale: Option<f64>) -> DeckResult<&mut ImageNode> {
        let image = ImageNode::from_svg(source, scale)?;
        Ok(push_node!(self.current_layer(), Node::Image, image))
    }

    /// Bulleted list.
    pub fn list(&mut self) -> &mut ListNode {
        push_node!(self.current_layer(), Node::List, ListNode::new())
    }

    /// Titled frame (title in markup).
    pub fn frame(&mut self, title: &str) -> &mut FrameNode {
        push_node!(self.current_layer(), Node::Frame, FrameNode::new(title))
    }

    /// Horizontal row of columns.
    pub fn columns(&mut self) -> &mut ColumnsNode {
        push_node!(self.current_layer(), Node::Columns, ColumnsNode::new())
    }

    /// Fixed empty space.
    pub fn space(&mut self, width: f64, height: f64) -> &mut SpaceNode {
        push_node!(self.current_layer(), Node::Space, SpaceNode::new(width, height))
    }

    /// Horizontal rule spanning the available width.
    pub fn separator(&mut self) -> &mut SeparatorNode {
        push_node!(
            self.current_layer(),
            Node::Separator,
            SeparatorNode::new(Orientation::Horizontal)
        )
    }

    /// User-defined leaf.
    pub fn custom(&mut self, element: impl CustomElement + 'static) -> &mut CustomNode {
        let node = CustomNode {
            base: NodeBase::default(),
            element: Box::new(element),
        };
        push_node!(self.current_layer(), Node::Custom, node)
    }
}

impl Element for BoxNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

fn markup_block(kind: TextKind, text: &str, role: Option<String>) -> TextBlock {
    let text = text.trim();
    TextBlock::new(kind, text.to_string(), parse_markup(text)).with_role(role)
}

/// Bulleted list; each item is a box.
#[derive(Debug, Default)]
pub struct ListNode {
    base: NodeBase,
    items: Vec<BoxNode>,
}

impl ListNode {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item box.
    pub fn item(&mut self) -> &mut BoxNode {
        self.items.push(BoxNode::new(BoxRole::ListItem));
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    /// Items in order.
    pub fn items(&self) -> &[BoxNode] {
        &self.items
    }
}

impl Element for ListNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

/// Box with a title bar.
#[derive(Debug)]
pub struct FrameNode {
    base: NodeBase,
    title: String,
    title_tokens: Vec<Token>,
    body: BoxNode,
}

impl FrameNode {
    /// Frame with a markup title and an empty body.
    pub fn new(title: &str) -> Self {
        Self {
            base: NodeBase::default(),
            title: title.to_string(),
            title_tokens: parse_markup(title),
            body: BoxNode::new(BoxRole::FrameBody),
        }
    }

    /// Title source.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title token stream.
    pub fn title_tokens(&self) -> &[Token] {
        &self.title_tokens
    }

    /// The body box.
    pub fn body(&self) -> &BoxNode {
        &self.body
    }

    /// The body box, for adding content.
    pub fn body_mut(&mut self) -> &mut BoxNode {
        &mut self.body
    }
}

impl Element for FrameNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

/// Row of columns with advisory ratios.
#[derive(Debug, Default)]
pub struct ColumnsNode {
    base: NodeBase,
    columns: Vec<Node>,
    ratios: Vec<f64>,
}

impl ColumnsNode {
    /// Empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column box. The ratio is recorded but columns keep their natural widths.
    pub fn column(&mut self, ratio: f64) -> &mut BoxNode {
        self.ratios.push(ratio);
        push_node!(&mut self.columns, Node::Box, BoxNode::new(BoxRole::Column))
    }

    /// Fixed gap between columns.
    pub fn space(&mut self, width: f64, height: f64) -> &mut SpaceNode {
        self.ratios.push(0.0);
        push_node!(&mut self.columns, Node::Space, SpaceNode::new(width, height))
    }

    /// Vertical rule spanning the available height.
    pub fn separator(&mut self) -> &mut SeparatorNode {
        self.ratios.push(0.0);
        push_node!(
            &mut self.columns,
            Node::Separator,
            SeparatorNode::new(Orientation::Vertical)
        )
    }

    /// Entries in order.
    pub fn columns(&self) -> &[Node] {
        &self.columns
    }

    /// Ratio of each entry (0 for spaces and separators).
    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }
}

impl Element for ColumnsNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

/// Direction of a separator line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Spans the width.
    Horizontal,
    /// Spans the height.
    Vertical,
}

/// Straight rule.
#[derive(Clone, Debug)]
pub struct SeparatorNode {
    base: NodeBase,
    orientation: Orientation,
    thickness: Option<f64>,
}

impl SeparatorNode {
    /// Separator with the theme's thickness.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            base: NodeBase::default(),
            orientation,
            thickness: None,
        }
    }

    /// Override the thickness.
    pub fn with_thickness(&mut self, thickness: f64) -> &mut Self {
        self.thickness = Some(thickness.max(0.0));
        self
    }

    /// Direction.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Explicit thickness, if any.
    pub fn thickness(&self) -> Option<f64> {
        self.thickness
    }
}

impl Element for SeparatorNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

/// Fixed-size empty leaf. Always visible.
#[derive(Clone, Debug, Default)]
pub struct SpaceNode {
    base: NodeBase,
    width: f64,
    height: f64,
}

impl SpaceNode {
    /// Space of the given size; negative sizes clamp to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            base: NodeBase::default(),
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Shared node state (always the default, visible from step 1).
    pub fn base(&self) -> &NodeBase {
        &self.base
    }
}

#[cfg(test)]
#[path = "../../tests/unit/element/container.rs"]
mod tests;
