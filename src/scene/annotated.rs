//! External SVG scene graphs with step annotations.
//!
//! A graphic element opts into step-dependent visibility with a label attribute (for example
//! `inkscape:label`) containing the marker `**` followed by `N` (visible from inner step `N`) or
//! `N-M` (visible in inner steps `N..=M`). The parsed tree is immutable; per-step views are
//! produced by filtering while serializing.

use std::io;

use anyhow::Context as _;
use quick_xml::events::{BytesCData, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::foundation::core::Step;
use crate::foundation::error::{DeckError, DeckResult};

/// Substring that introduces a step annotation inside a label.
pub const STEP_MARKER: &str = "**";

/// Inner-step visibility of one annotated element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepLabel {
    /// First inner step.
    pub start: Step,
    /// Last inner step, `None` when unbounded.
    pub end: Option<Step>,
}

impl StepLabel {
    fn excludes(self, step: Step) -> bool {
        step < self.start || self.end.is_some_and(|end| step > end)
    }
}

/// Parse the annotation of a label value. Labels without the marker, or with any other content
/// after it, carry no annotation.
pub fn parse_step_label(label: &str) -> Option<StepLabel> {
    let pos = label.find(STEP_MARKER)?;
    let rest = label[pos + STEP_MARKER.len()..].trim();
    if is_digits(rest) {
        return Some(StepLabel {
            start: rest.parse().ok()?,
            end: None,
        });
    }
    let (a, b) = rest.split_once('-')?;
    if is_digits(a) && is_digits(b) {
        return Some(StepLabel {
            start: a.parse().ok()?,
            end: Some(b.parse().ok()?),
        });
    }
    None
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Clone, Debug)]
enum SceneNode {
    Element(SceneElement),
    Text(BytesText<'static>),
    CData(BytesCData<'static>),
}

#[derive(Clone, Debug)]
struct SceneElement {
    /// Start tag as read, so attributes round-trip with their original quoting.
    start: BytesStart<'static>,
    children: Vec<SceneNode>,
    label: Option<StepLabel>,
}

impl SceneElement {
    fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }

    fn attr(&self, name: &str) -> Option<String> {
        let attr = self.start.try_get_attribute(name).ok()??;
        attr.unescape_value().ok().map(|v| v.into_owned())
    }
}

/// Parsed external scene graph with its intrinsic size and inner step count.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    root: SceneElement,
    width: f64,
    height: f64,
    max_inner_step: Step,
    annotated: bool,
    markup: String,
}

impl SceneGraph {
    /// Parse an SVG document. The root must carry `width` and `height`.
    pub fn parse(source: &str) -> DeckResult<Self> {
        let root = parse_tree(source)?;
        let width = root
            .attr("width")
            .ok_or_else(|| DeckError::construction("image root has no width attribute"))
            .and_then(|v| string_to_pixels(&v))?;
        let height = root
            .attr("height")
            .ok_or_else(|| DeckError::construction("image root has no height attribute"))
            .and_then(|v| string_to_pixels(&v))?;

        let mut max_inner_step = 1;
        let mut annotated = false;
        visit_labels(&root, &mut |label| {
            annotated = true;
            max_inner_step = max_inner_step.max(label.end.unwrap_or(label.start));
        });

        let markup = serialize(&root, None)?;
        Ok(Self {
            root,
            width,
            height,
            max_inner_step,
            annotated,
            markup,
        })
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Largest inner step named by any annotation, or 1.
    pub fn max_inner_step(&self) -> Step {
        self.max_inner_step
    }

    /// Whether any element carries a step annotation.
    pub fn has_annotations(&self) -> bool {
        self.annotated
    }

    /// The whole graph, serialized.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Serialized view at an inner step: annotated elements excluded at `inner_step` are dropped
    /// together with their subtree.
    pub fn view_at(&self, inner_step: Step) -> DeckResult<String> {
        if !self.annotated {
            return Ok(self.markup.clone());
        }
        serialize(&self.root, Some(inner_step))
    }
}

/// Convert an SVG length to pixels (`mm`, `cm`, or unitless/pixel values).
pub fn string_to_pixels(text: &str) -> DeckResult<f64> {
    let text = text.trim();
    let split = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphabetic())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let (number, suffix) = text.split_at(split);
    let factor = match suffix {
        "mm" => 3.543307,
        "cm" => 35.43307,
        _ => 1.0,
    };
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| DeckError::construction(format!("invalid svg length '{text}'")))?;
    Ok(value * factor)
}

fn parse_tree(source: &str) -> DeckResult<SceneElement> {
    let mut reader = Reader::from_str(source);
    let mut stack = Vec::<SceneElement>::new();
    let mut root = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            DeckError::construction(format!(
                "malformed svg at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;
        match event {
            Event::Start(e) => stack.push(element_from(&e)?),
            Event::Empty(e) => {
                let el = element_from(&e)?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| DeckError::construction("unbalanced svg end tag"))?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.children.push(SceneNode::Text(t.into_owned()));
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    top.children.push(SceneNode::CData(c.into_owned()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DeckError::construction("unclosed svg element"));
    }
    let root = root.ok_or_else(|| DeckError::construction("svg document has no root element"))?;
    let name = root.name();
    if name.rsplit(':').next() != Some("svg") {
        return Err(DeckError::construction(format!(
            "image root element is <{name}>, expected <svg>"
        )));
    }
    Ok(root)
}

fn element_from(e: &BytesStart<'_>) -> DeckResult<SceneElement> {
    let mut label = None;
    for attr in e.attributes() {
        let attr = attr.map_err(|err| {
            let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
            DeckError::construction(format!("bad attribute in <{name}>: {err}"))
        })?;
        if attr.key.local_name().as_ref() == b"label"
            && let Ok(text) = attr.unescape_value()
        {
            label = parse_step_label(&text);
        }
    }
    Ok(SceneElement {
        start: e.clone().into_owned(),
        children: Vec::new(),
        label,
    })
}

fn attach(
    stack: &mut [SceneElement],
    root: &mut Option<SceneElement>,
    el: SceneElement,
) -> DeckResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(SceneNode::Element(el));
        return Ok(());
    }
    if root.is_some() {
        return Err(DeckError::construction("svg document has several root elements"));
    }
    *root = Some(el);
    Ok(())
}

fn visit_labels(el: &SceneElement, f: &mut impl FnMut(StepLabel)) {
    if let Some(label) = el.label {
        f(label);
    }
    for child in &el.children {
        if let SceneNode::Element(c) = child {
            visit_labels(c, f);
        }
    }
}

fn serialize(root: &SceneElement, step: Option<Step>) -> DeckResult<String> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, root, step).context("failed to serialize svg scene")?;
    Ok(String::from_utf8(writer.into_inner()).context("serialized svg scene is not utf-8")?)
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    el: &SceneElement,
    step: Option<Step>,
) -> io::Result<()> {
    if el.children.is_empty() {
        return writer.write_event(Event::Empty(el.start.borrow()));
    }
    writer.write_event(Event::Start(el.start.borrow()))?;
    for child in &el.children {
        match child {
            SceneNode::Element(c) => {
                if let (Some(step), Some(label)) = (step, c.label)
                    && label.excludes(step)
                {
                    continue;
                }
                write_element(writer, c, step)?;
            }
            SceneNode::Text(t) => writer.write_event(Event::Text(t.borrow()))?,
            SceneNode::CData(c) => writer.write_event(Event::CData(c.borrow()))?,
        }
    }
    writer.write_event(Event::End(el.start.to_end()))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/annotated.rs"]
mod tests;
