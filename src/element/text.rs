use std::collections::BTreeSet;

use crate::element::node::{Element, NodeBase};
use crate::foundation::core::{IntoShowRange, ShowRange, Step};
use crate::foundation::error::{DeckError, DeckResult};
use crate::text::markup::Token;

/// Which text-like node a [`TextBlock`] backs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKind {
    /// Plain styled text.
    Text,
    /// Code block.
    Code,
    /// Shell block.
    Shell,
}

/// Lines selected by an emphasis call (1-based).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LineSelection {
    /// Every line of the text.
    #[default]
    All,
    /// One line.
    Line(u32),
    /// An explicit set of lines.
    Lines(BTreeSet<u32>),
}

impl From<u32> for LineSelection {
    fn from(line: u32) -> Self {
        LineSelection::Line(line)
    }
}

impl<const N: usize> From<[u32; N]> for LineSelection {
    fn from(lines: [u32; N]) -> Self {
        LineSelection::Lines(lines.into_iter().collect())
    }
}

impl From<Vec<u32>> for LineSelection {
    fn from(lines: Vec<u32>) -> Self {
        LineSelection::Lines(lines.into_iter().collect())
    }
}

impl From<BTreeSet<u32>> for LineSelection {
    fn from(lines: BTreeSet<u32>) -> Self {
        LineSelection::Lines(lines)
    }
}

/// Predicate over the raw source line applied after selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LineFilter {
    /// Keep every selected line.
    #[default]
    Any,
    /// Keep lines whose content, leading whitespace removed, starts with the prefix.
    Prefix(String),
    /// Keep lines containing the substring.
    Contains(String),
}

impl LineFilter {
    fn accepts(&self, line: &str) -> bool {
        match self {
            LineFilter::Any => true,
            LineFilter::Prefix(p) => line.trim_start().starts_with(p.as_str()),
            LineFilter::Contains(s) => line.contains(s.as_str()),
        }
    }
}

/// Background highlight of some lines during a step range.
#[derive(Clone, Debug, PartialEq)]
pub struct LineEmphasis {
    /// 1-based line numbers.
    pub lines: BTreeSet<u32>,
    /// Steps during which the highlight is drawn.
    pub show: ShowRange,
    /// Explicit color; `None` uses the node kind's theme color.
    pub color: Option<String>,
}

/// Content shared by text, code and shell nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    base: NodeBase,
    kind: TextKind,
    source: String,
    tokens: Vec<Token>,
    role: Option<String>,
    language: Option<String>,
    emphasis: Vec<LineEmphasis>,
}

impl TextBlock {
    pub(crate) fn new(kind: TextKind, source: String, tokens: Vec<Token>) -> Self {
        Self {
            base: NodeBase::default(),
            kind,
            source,
            tokens,
            role: None,
            language: None,
            emphasis: Vec::new(),
        }
    }

    pub(crate) fn with_role(mut self, role: Option<String>) -> Self {
        self.role = role;
        self
    }

    pub(crate) fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// Node kind.
    pub fn kind(&self) -> TextKind {
        self.kind
    }

    /// Raw source text, as given to the builder (trimmed).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Rendered token stream.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Style role used for measurement and drawing: the explicit role for text, `code` or
    /// `shell` for the other kinds.
    pub fn role(&self) -> Option<&str> {
        match self.kind {
            TextKind::Text => self.role.as_deref(),
            TextKind::Code => Some(crate::style::theme::names::CODE),
            TextKind::Shell => Some(crate::style::theme::names::SHELL),
        }
    }

    /// Language of a code block.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Accumulated emphasis entries, in call order.
    pub fn emphasis(&self) -> &[LineEmphasis] {
        &self.emphasis
    }

    /// Number of source lines.
    pub fn line_total(&self) -> u32 {
        self.source.split('\n').count() as u32
    }

    /// Highlight `lines` during `show` with the theme's emphasis color.
    pub fn line_emphasis(
        &mut self,
        lines: impl Into<LineSelection>,
        show: impl IntoShowRange,
    ) -> DeckResult<&mut Self> {
        self.line_emphasis_with(lines, LineFilter::Any, show, None)
    }

    /// Highlight the selected lines accepted by `filter` during `show`.
    ///
    /// The filter sees the raw source line. Calls accumulate; a call that selects no line adds
    /// nothing. Line numbers outside the text are construction errors.
    pub fn line_emphasis_with(
        &mut self,
        lines: impl Into<LineSelection>,
        filter: LineFilter,
        show: impl IntoShowRange,
        color: Option<&str>,
    ) -> DeckResult<&mut Self> {
        let show = show.into_show_range()?;
        let selected = self.select_lines(lines.into(), &filter)?;
        if !selected.is_empty() {
            self.emphasis.push(LineEmphasis {
                lines: selected,
                show,
                color: color.map(str::to_string),
            });
        }
        Ok(self)
    }

    /// Highlight each line accepted by `filter` in its own step, the first at `start`, then one
    /// step later per accepted line.
    pub fn consecutive_line_emphasis(
        &mut self,
        start: Step,
        filter: LineFilter,
        color: Option<&str>,
    ) -> DeckResult<&mut Self> {
        let mut step = start;
        let selected = self.select_lines(LineSelection::All, &filter)?;
        for line in selected {
            self.emphasis.push(LineEmphasis {
                lines: BTreeSet::from([line]),
                show: ShowRange::new(step, Some(step))?,
                color: color.map(str::to_string),
            });
            step += 1;
        }
        Ok(self)
    }

    /// Largest step named by an emphasis range.
    pub(crate) fn emphasis_max_step(&self) -> Step {
        self.emphasis
            .iter()
            .map(|e| e.show.last_step())
            .max()
            .unwrap_or(1)
    }

    fn select_lines(&self, lines: LineSelection, filter: &LineFilter) -> DeckResult<BTreeSet<u32>> {
        let source: Vec<&str> = self.source.split('\n').collect();
        let total = source.len() as u32;
        let selected: BTreeSet<u32> = match lines {
            LineSelection::All => (1..=total).collect(),
            LineSelection::Line(l) => BTreeSet::from([l]),
            LineSelection::Lines(set) => set,
        };
        if let Some(bad) = selected.iter().find(|&&l| l == 0 || l > total) {
            return Err(DeckError::construction(format!(
                "emphasized line {bad} is outside the text (lines 1..={total})"
            )));
        }
        Ok(selected
            .into_iter()
            .filter(|&l| filter.accepts(source[(l - 1) as usize]))
            .collect())
    }
}

impl Element for TextBlock {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

#[cfg(test)]
#[path = "../../tests/unit/element/text.rs"]
mod tests;
