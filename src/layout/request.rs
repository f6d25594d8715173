use crate::cache::query::Query;
use crate::element::container::{
    BoxNode, ColumnsNode, FrameNode, ListNode, Orientation, SeparatorNode,
};
use crate::element::node::{Element, Node};
use crate::foundation::core::{SizeRequest, merge_size_requests};
use crate::foundation::error::DeckResult;
use crate::layout::context::{Ancestor, LayoutCtx};
use crate::layout::stack::{Axis, stack_request};
use crate::style::theme::names;

impl Node {
    /// Natural size and fill flags of this node under `ctx` (the parent's context).
    ///
    /// Requests do not depend on visibility: hidden children keep their space so a slide's
    /// layout stays put while steps reveal content.
    pub fn size_request<'a>(&'a self, ctx: &LayoutCtx<'a>) -> DeckResult<SizeRequest> {
        let ctx = self.enter(ctx);
        match self {
            Node::Text(t) => {
                let (w, h) = ctx.text_size(t.tokens(), t.role())?;
                Ok(SizeRequest::with_fill(w, h, true, false))
            }
            Node::Code(t) | Node::Shell(t) => {
                let (w, h) = ctx.text_size(t.tokens(), t.role())?;
                Ok(SizeRequest::fixed(w, h))
            }
            Node::Image(i) => Ok(SizeRequest::fixed(i.width(), i.height())),
            Node::Box(b) => b.layers_request(&ctx),
            Node::List(l) => list_request(l, &ctx),
            Node::Frame(f) => frame_request(f, &ctx),
            Node::Columns(c) => columns_request(c, &ctx),
            Node::Separator(s) => Ok(separator_request(s, &ctx)),
            Node::Space(s) => Ok(SizeRequest::fixed(s.width(), s.height())),
            Node::Custom(c) => c.element().size_request(&ctx),
        }
    }

    /// Append the measurement queries of this subtree to `out`, parents before children.
    pub fn gather_queries<'a>(
        &'a self,
        ctx: &LayoutCtx<'a>,
        out: &mut Vec<Query>,
    ) -> DeckResult<()> {
        let ctx = self.enter(ctx);
        match self {
            Node::Text(t) | Node::Code(t) | Node::Shell(t) => {
                out.push(ctx.text_query(t.tokens(), t.role())?);
            }
            Node::Box(b) => b.gather_children(&ctx, out)?,
            Node::List(l) => {
                for item in l.items() {
                    item.gather_queries(&ctx, out)?;
                }
            }
            Node::Frame(f) => {
                out.push(ctx.text_query(f.title_tokens(), Some(names::FRAME_TITLE))?);
                f.body().gather_queries(&ctx, out)?;
            }
            Node::Columns(c) => {
                for entry in c.columns() {
                    entry.gather_queries(&ctx, out)?;
                }
            }
            Node::Custom(c) => c.element().emit_queries(&ctx, out)?,
            Node::Image(_) | Node::Separator(_) | Node::Space(_) => {}
        }
        Ok(())
    }
}

impl BoxNode {
    /// Context for work done inside this box.
    pub(crate) fn enter<'a>(&'a self, ctx: &LayoutCtx<'a>) -> LayoutCtx<'a> {
        ctx.enter(Ancestor::Box(self.role()), self.base().style_override())
    }

    /// Size request of the box as a child of `ctx`.
    pub fn size_request<'a>(&'a self, ctx: &LayoutCtx<'a>) -> DeckResult<SizeRequest> {
        self.layers_request(&self.enter(ctx))
    }

    /// Queries of the box's subtree, with `ctx` the parent's context.
    pub fn gather_queries<'a>(
        &'a self,
        ctx: &LayoutCtx<'a>,
        out: &mut Vec<Query>,
    ) -> DeckResult<()> {
        self.gather_children(&self.enter(ctx), out)
    }

    /// Requests of one layer's children, in order. `ctx` is the box's own context.
    pub(crate) fn layer_requests<'a>(
        layer: &'a [Node],
        ctx: &LayoutCtx<'a>,
    ) -> DeckResult<Vec<SizeRequest>> {
        layer.iter().map(|n| n.size_request(ctx)).collect()
    }

    fn layers_request<'a>(&'a self, ctx: &LayoutCtx<'a>) -> DeckResult<SizeRequest> {
        let padding = ctx.theme().metrics.box_padding;
        let per_layer = self
            .layers()
            .iter()
            .map(|layer| {
                Ok(stack_request(
                    &Self::layer_requests(layer, ctx)?,
                    padding,
                    Axis::Vertical,
                ))
            })
            .collect::<DeckResult<Vec<_>>>()?;
        Ok(merge_size_requests(&per_layer))
    }

    fn gather_children<'a>(&'a self, ctx: &LayoutCtx<'a>, out: &mut Vec<Query>) -> DeckResult<()> {
        for child in self.children() {
            child.gather_queries(ctx, out)?;
        }
        Ok(())
    }
}

/// Requests of the list's item boxes. `ctx` is the list's own context.
pub(crate) fn item_requests<'a>(
    list: &'a ListNode,
    ctx: &LayoutCtx<'a>,
) -> DeckResult<Vec<SizeRequest>> {
    list.items().iter().map(|i| i.size_request(ctx)).collect()
}

/// Requests of the columns' entries. `ctx` is the columns node's own context.
pub(crate) fn column_requests<'a>(
    columns: &'a ColumnsNode,
    ctx: &LayoutCtx<'a>,
) -> DeckResult<Vec<SizeRequest>> {
    columns.columns().iter().map(|c| c.size_request(ctx)).collect()
}

/// Thickness of a separator, falling back to the theme's.
pub(crate) fn separator_thickness(separator: &SeparatorNode, ctx: &LayoutCtx<'_>) -> f64 {
    separator
        .thickness()
        .unwrap_or(ctx.theme().metrics.separator_thickness)
}

fn list_request<'a>(list: &'a ListNode, ctx: &LayoutCtx<'a>) -> DeckResult<SizeRequest> {
    let metrics = &ctx.theme().metrics;
    let stacked = stack_request(&item_requests(list, ctx)?, metrics.box_padding, Axis::Vertical);
    Ok(stacked.resize(metrics.list_indent, 0.0))
}

fn frame_request<'a>(frame: &'a FrameNode, ctx: &LayoutCtx<'a>) -> DeckResult<SizeRequest> {
    let padding = ctx.theme().metrics.frame_padding;
    let body = frame.body().size_request(ctx)?;
    let (title_w, title_h) = ctx.text_size(frame.title_tokens(), Some(names::FRAME_TITLE))?;
    Ok(body.ensure(title_w, 0.0).resize(padding, title_h + padding))
}

fn columns_request<'a>(columns: &'a ColumnsNode, ctx: &LayoutCtx<'a>) -> DeckResult<SizeRequest> {
    let padding = ctx.theme().metrics.column_padding;
    let row = stack_request(&column_requests(columns, ctx)?, padding, Axis::Horizontal);
    Ok(SizeRequest {
        fill_x: true,
        ..row
    })
}

fn separator_request(separator: &SeparatorNode, ctx: &LayoutCtx<'_>) -> SizeRequest {
    let thickness = separator_thickness(separator, ctx);
    match separator.orientation() {
        Orientation::Horizontal => SizeRequest::with_fill(0.0, thickness, true, false),
        Orientation::Vertical => SizeRequest::with_fill(thickness, 0.0, false, true),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/request.rs"]
mod tests;
