use std::sync::Arc;

use crate::cache::query::{Measured, Query, QueryCache, QueryKey};
use crate::element::container::BoxRole;
use crate::foundation::core::Step;
use crate::foundation::error::{DeckError, DeckResult};
use crate::scene::canvas::{MEASURE_ID, text_measure_svg};
use crate::style::text_style::{TextStyle, merge_styles};
use crate::style::theme::{StyleTable, Theme, names};
use crate::text::markup::{Token, line_count};
use crate::tools::measure::TextMeasurer;

/// What an entered node contributes to the style cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ancestor {
    /// A frame: its descendants pick up the `frame` style.
    Frame,
    /// A box with its role.
    Box(BoxRole),
    /// Any other node.
    Other,
}

/// Immutable context threaded through measurement, query discovery and rendering.
///
/// Entering a node yields a new context whose ancestor list is extended by that node; the
/// parent's context is left untouched.
#[derive(Clone)]
pub struct LayoutCtx<'a> {
    theme: &'a Theme,
    styles: &'a StyleTable,
    step: Step,
    queries: Option<&'a QueryCache>,
    measurer: Option<&'a Arc<dyn TextMeasurer>>,
    ancestors: Vec<Ancestor>,
    own_style: Option<&'a TextStyle>,
}

impl<'a> LayoutCtx<'a> {
    /// Context for step-independent query discovery.
    pub fn for_discovery(
        theme: &'a Theme,
        styles: &'a StyleTable,
        measurer: &'a Arc<dyn TextMeasurer>,
    ) -> Self {
        Self {
            theme,
            styles,
            step: 1,
            queries: None,
            measurer: Some(measurer),
            ancestors: Vec::new(),
            own_style: None,
        }
    }

    /// Context for measuring and rendering one step against resolved queries.
    pub fn for_render(
        theme: &'a Theme,
        styles: &'a StyleTable,
        queries: &'a QueryCache,
        step: Step,
    ) -> Self {
        Self {
            theme,
            styles,
            step,
            queries: Some(queries),
            measurer: None,
            ancestors: Vec::new(),
            own_style: None,
        }
    }

    /// Context for a child call: the ancestor list extended by the entered node.
    pub(crate) fn enter(&self, ancestor: Ancestor, own_style: Option<&'a TextStyle>) -> Self {
        let mut ancestors = Vec::with_capacity(self.ancestors.len() + 1);
        ancestors.extend_from_slice(&self.ancestors);
        ancestors.push(ancestor);
        Self {
            ancestors,
            own_style,
            ..*self
        }
    }

    /// Step being rendered (1 during discovery).
    pub fn step(&self) -> Step {
        self.step
    }

    /// Active theme.
    pub fn theme(&self) -> &'a Theme {
        self.theme
    }

    /// Named styles (theme styles overlaid with user styles).
    pub fn styles(&self) -> &'a StyleTable {
        self.styles
    }

    /// Entered nodes, outermost first. The last entry is the current node.
    pub fn ancestors(&self) -> &[Ancestor] {
        &self.ancestors
    }

    /// Cascaded style for text drawn by the current node with an optional role.
    ///
    /// Order, lowest priority first: `default`, `frame` (inside a frame), `list_item` (inside a
    /// list item or column box), the role style, the current node's own override.
    pub fn text_style(&self, role: Option<&str>) -> DeckResult<TextStyle> {
        let mut chain: Vec<&TextStyle> = Vec::with_capacity(5);
        chain.extend(self.styles.get(names::DEFAULT));
        if self.ancestors.contains(&Ancestor::Frame) {
            chain.extend(self.styles.get(names::FRAME));
        }
        if self
            .ancestors
            .iter()
            .any(|a| matches!(a, Ancestor::Box(r) if r.cascades_list_item()))
        {
            chain.extend(self.styles.get(names::LIST_ITEM));
        }
        if let Some(role) = role {
            let style = self
                .styles
                .get(role)
                .ok_or_else(|| DeckError::construction(format!("unknown text style '{role}'")))?;
            chain.push(style);
        }
        chain.extend(self.own_style);
        Ok(merge_styles(chain))
    }

    /// The measurement query for `tokens` under the cascaded style of `role`.
    pub fn text_query(&self, tokens: &[Token], role: Option<&str>) -> DeckResult<Query> {
        let style = self.text_style(role)?;
        let svg = text_measure_svg(tokens, &style, self.styles)?;
        let key = QueryKey::new("textsize", &svg);
        let measurer = self.measurer.cloned().ok_or_else(|| {
            DeckError::query(key.short(), "no measurement source bound to this context")
        })?;
        let height = f64::from(line_count(tokens)) * style.line_height();
        Ok(Query::new(key, move || {
            let width = measurer.text_width(&svg, MEASURE_ID)?;
            Ok(Measured { width, height })
        }))
    }

    /// Resolved size of `tokens` under the cascaded style of `role`, inflated by the style's text
    /// offset on each side.
    pub fn text_size(&self, tokens: &[Token], role: Option<&str>) -> DeckResult<(f64, f64)> {
        let style = self.text_style(role)?;
        let key = QueryKey::new("textsize", &text_measure_svg(tokens, &style, self.styles)?);
        let measured = self
            .queries
            .and_then(|q| q.get(&key))
            .ok_or_else(|| DeckError::query(key.short(), "measurement was not resolved"))?;
        let (ox, oy) = style.text_offset();
        Ok((measured.width + 2.0 * ox, measured.height + 2.0 * oy))
    }
}

impl std::fmt::Debug for LayoutCtx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutCtx")
            .field("step", &self.step)
            .field("ancestors", &self.ancestors)
            .field("resolved", &self.queries.map(QueryCache::len))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/context.rs"]
mod tests;
