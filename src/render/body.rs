use crate::element::container::{
    BoxNode, ColumnsNode, FrameNode, ListNode, Orientation, SeparatorNode,
};
use crate::element::node::{Element, Node};
use crate::element::text::TextBlock;
use crate::foundation::core::Rect;
use crate::foundation::error::DeckResult;
use crate::layout::context::LayoutCtx;
use crate::layout::request::{column_requests, item_requests, separator_thickness};
use crate::layout::stack::{Axis, arrange};
use crate::scene::canvas::PageCanvas;
use crate::style::text_style::{Align, TextStyle};
use crate::style::theme::{StyleTable, names};
use crate::text::markup::Token;

const BULLET: &str = "\u{2022}";
const FRAME_TITLE_TOP: f64 = 5.0;
const HEADER_TITLE_INSET: f64 = 40.0;
const HEADER_TITLE_TOP: f64 = 10.0;

/// How a slide frames its content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlideRole {
    /// Header bar when titled, full page otherwise.
    #[default]
    Normal,
    /// Large centered title band.
    Title,
}

impl Node {
    /// Draw the node into `rect`. Does nothing when the node is hidden at the context's step.
    pub fn render<'a>(
        &'a self,
        ctx: &LayoutCtx<'a>,
        canvas: &mut PageCanvas,
        rect: Rect,
    ) -> DeckResult<()> {
        if !self.is_visible(ctx.step()) {
            return Ok(());
        }
        let ctx = self.enter(ctx);
        let palette = &ctx.theme().palette;
        match self {
            Node::Text(t) => render_text(t, &ctx, canvas, rect),
            Node::Code(t) => render_block(
                t,
                &ctx,
                canvas,
                rect,
                &palette.code_background,
                &palette.code_emphasis,
            ),
            Node::Shell(t) => render_block(
                t,
                &ctx,
                canvas,
                rect,
                &palette.shell_background,
                &palette.shell_emphasis,
            ),
            Node::Image(i) => {
                canvas.draw_image(&i.markup_at(ctx.step())?, rect.x, rect.y, i.scale());
                Ok(())
            }
            Node::Box(b) => b.render_layers(&ctx, canvas, rect),
            Node::List(l) => render_list(l, &ctx, canvas, rect),
            Node::Frame(f) => render_frame(f, &ctx, canvas, rect),
            Node::Columns(c) => render_columns(c, &ctx, canvas, rect),
            Node::Separator(s) => {
                render_separator(s, &ctx, canvas, rect);
                Ok(())
            }
            Node::Space(_) => Ok(()),
            Node::Custom(c) => c.element().render_body(&ctx, canvas, rect),
        }
    }
}

impl BoxNode {
    /// Draw the box into `rect`, with `ctx` the parent's context.
    pub fn render<'a>(
        &'a self,
        ctx: &LayoutCtx<'a>,
        canvas: &mut PageCanvas,
        rect: Rect,
    ) -> DeckResult<()> {
        if !self.is_visible(ctx.step()) {
            return Ok(());
        }
        self.render_layers(&self.enter(ctx), canvas, rect)
    }

    fn render_layers<'a>(
        &'a self,
        ctx: &LayoutCtx<'a>,
        canvas: &mut PageCanvas,
        rect: Rect,
    ) -> DeckResult<()> {
        let padding = ctx.theme().metrics.box_padding;
        for layer in self.layers() {
            let requests = BoxNode::layer_requests(layer, ctx)?;
            let rects = arrange(rect, &requests, padding, Axis::Vertical, false)?;
            for (child, r) in layer.iter().zip(rects) {
                child.render(ctx, canvas, r)?;
            }
        }
        Ok(())
    }
}

/// Draw the slide chrome for `role` and the slide's root box below it.
pub fn render_slide<'a>(
    ctx: &LayoutCtx<'a>,
    canvas: &mut PageCanvas,
    role: SlideRole,
    title: Option<&[Token]>,
    root: &'a BoxNode,
) -> DeckResult<()> {
    let theme = ctx.theme();
    let (w, h) = (f64::from(canvas.width()), f64::from(canvas.height()));
    let page = Rect::new(0.0, 0.0, w, h);
    canvas.draw_rect(page, &theme.palette.background);

    match (role, title) {
        (SlideRole::Title, title) => {
            let style = &theme.main_title_style;
            let size = style.font_size();
            canvas.draw_rect(
                Rect::new(0.0, h / 2.0 - size * 1.2, w, size * 2.4),
                &theme.palette.minor,
            );
            canvas.draw_rect(
                Rect::new(0.0, h / 2.0 - size, w, size * 2.0),
                &theme.palette.major,
            );
            draw_offset_text(
                canvas,
                ctx.styles(),
                w / 2.0,
                h / 2.0 - size * 0.8,
                title.unwrap_or_default(),
                style,
            )?;
            let top = h / 2.0 + size;
            root.render(ctx, canvas, Rect::new(0.0, top, w, h - top))
        }
        (SlideRole::Normal, None) => root.render(ctx, canvas, page),
        (SlideRole::Normal, Some(title)) => {
            let top = theme.metrics.header_height;
            let strip = theme.metrics.header_strip;
            canvas.draw_rect(Rect::new(0.0, 0.0, w, top), &theme.palette.major);
            canvas.draw_rect(Rect::new(0.0, top - strip, w, strip), &theme.palette.minor);
            draw_offset_text(
                canvas,
                ctx.styles(),
                w - HEADER_TITLE_INSET,
                HEADER_TITLE_TOP,
                title,
                &theme.title_style,
            )?;
            root.render(ctx, canvas, Rect::new(0.0, top, w, h - top))
        }
    }
}

/// Draw text whose box starts at `(x, y)`, shifted by the style's text offset.
fn draw_offset_text(
    canvas: &mut PageCanvas,
    styles: &StyleTable,
    x: f64,
    y: f64,
    tokens: &[Token],
    style: &TextStyle,
) -> DeckResult<()> {
    let (ox, oy) = style.text_offset();
    let x = match style.alignment() {
        Align::Left => x + ox,
        Align::Center => x,
        Align::Right => x - ox,
    };
    canvas.draw_text(x, y + style.font_size() + oy, tokens, style, styles)
}

fn render_text(
    text: &TextBlock,
    ctx: &LayoutCtx<'_>,
    canvas: &mut PageCanvas,
    rect: Rect,
) -> DeckResult<()> {
    let style = ctx.text_style(text.role())?;
    draw_emphasis(
        text,
        ctx,
        canvas,
        rect,
        &style,
        &ctx.theme().palette.text_emphasis,
    );
    let x = match style.alignment() {
        Align::Left => rect.x,
        Align::Center => rect.middle_x(),
        Align::Right => rect.x2(),
    };
    draw_offset_text(canvas, ctx.styles(), x, rect.y, text.tokens(), &style)
}

fn render_block(
    block: &TextBlock,
    ctx: &LayoutCtx<'_>,
    canvas: &mut PageCanvas,
    rect: Rect,
    background: &str,
    default_emphasis: &str,
) -> DeckResult<()> {
    canvas.draw_rect(rect, background);
    let style = ctx.text_style(block.role())?;
    draw_emphasis(block, ctx, canvas, rect, &style, default_emphasis);
    draw_offset_text(canvas, ctx.styles(), rect.x, rect.y, block.tokens(), &style)
}

/// Bars behind the emphasized lines of every entry active at the context's step, spanning the
/// full width of `rect`.
fn draw_emphasis(
    block: &TextBlock,
    ctx: &LayoutCtx<'_>,
    canvas: &mut PageCanvas,
    rect: Rect,
    style: &TextStyle,
    default_color: &str,
) {
    let (_, oy) = style.text_offset();
    let line = style.line_height();
    for entry in block.emphasis().iter().filter(|e| e.show.contains(ctx.step())) {
        let color = entry.color.as_deref().unwrap_or(default_color);
        for &n in &entry.lines {
            let y = rect.y + oy + line * f64::from(n - 1);
            canvas.draw_rect(Rect::new(rect.x, y, rect.width, line + oy), color);
        }
    }
}

fn render_list<'a>(
    list: &'a ListNode,
    ctx: &LayoutCtx<'a>,
    canvas: &mut PageCanvas,
    rect: Rect,
) -> DeckResult<()> {
    let metrics = &ctx.theme().metrics;
    let style = ctx.text_style(None)?;
    let bullet = [Token::Text(BULLET.to_string())];
    let inner = rect.shrink(metrics.list_indent, 0.0, 0.0, 0.0);
    let rects = arrange(
        inner,
        &item_requests(list, ctx)?,
        metrics.box_padding,
        Axis::Vertical,
        true,
    )?;
    for (item, r) in list.items().iter().zip(rects) {
        if item.is_visible(ctx.step()) {
            draw_offset_text(canvas, ctx.styles(), rect.x, r.y, &bullet, &style)?;
        }
        item.render(ctx, canvas, r)?;
    }
    Ok(())
}

fn render_frame<'a>(
    frame: &'a FrameNode,
    ctx: &LayoutCtx<'a>,
    canvas: &mut PageCanvas,
    rect: Rect,
) -> DeckResult<()> {
    let theme = ctx.theme();
    let bar = theme.metrics.frame_title_bar;
    canvas.draw_rect(rect, &theme.palette.frame_background);
    canvas.draw_rect(Rect::new(rect.x, rect.y, rect.width, bar), &theme.palette.major);
    let style = ctx.text_style(Some(names::FRAME_TITLE))?;
    draw_offset_text(
        canvas,
        ctx.styles(),
        rect.x2() - theme.metrics.frame_padding,
        rect.y + FRAME_TITLE_TOP,
        frame.title_tokens(),
        &style,
    )?;
    frame.body().render(ctx, canvas, rect.shrink(0.0, 0.0, bar, 0.0))
}

fn render_columns<'a>(
    columns: &'a ColumnsNode,
    ctx: &LayoutCtx<'a>,
    canvas: &mut PageCanvas,
    rect: Rect,
) -> DeckResult<()> {
    let rects = arrange(
        rect,
        &column_requests(columns, ctx)?,
        ctx.theme().metrics.column_padding,
        Axis::Horizontal,
        false,
    )?;
    for (entry, r) in columns.columns().iter().zip(rects) {
        entry.render(ctx, canvas, r)?;
    }
    Ok(())
}

fn render_separator(
    separator: &SeparatorNode,
    ctx: &LayoutCtx<'_>,
    canvas: &mut PageCanvas,
    rect: Rect,
) {
    let thickness = separator_thickness(separator, ctx);
    let line = match separator.orientation() {
        Orientation::Horizontal => Rect::new(rect.x, rect.y, rect.width, thickness),
        Orientation::Vertical => Rect::new(rect.x, rect.y, thickness, rect.height),
    };
    canvas.draw_rect(line, &ctx.theme().palette.separator);
}

#[cfg(test)]
#[path = "../../tests/unit/render/body.rs"]
mod tests;
