use super::*;
use crate::style::text_style::Align;

struct CountingChars;

impl TextMeasurer for CountingChars {
    fn text_width(&self, svg: &str, _element_id: &str) -> DeckResult<f64> {
        Ok(svg.len() as f64)
    }
}

fn table() -> (Theme, StyleTable) {
    let theme = Theme::default();
    let styles = theme.style_table(&StyleTable::new());
    (theme, styles)
}

#[test]
fn cascade_orders_context_role_and_override() {
    let (theme, styles) = table();
    let cache = QueryCache::new();
    let root = LayoutCtx::for_render(&theme, &styles, &cache, 3);
    assert_eq!(root.step(), 3);
    assert_eq!(root.text_style(None).unwrap().alignment(), Align::Center);

    let item = root
        .enter(Ancestor::Other, None)
        .enter(Ancestor::Box(BoxRole::ListItem), None);
    assert_eq!(item.text_style(None).unwrap().alignment(), Align::Left);
    assert_eq!(item.text_style(Some("h1")).unwrap().font_size(), 60.0);

    let own = TextStyle::new().size(12.0).align(Align::Right);
    let leaf = item.enter(Ancestor::Other, Some(&own));
    let style = leaf.text_style(Some("h1")).unwrap();
    assert_eq!(style.font_size(), 12.0);
    assert_eq!(style.alignment(), Align::Right);

    // The override belongs to the entered node only.
    let below = leaf.enter(Ancestor::Other, None);
    assert_eq!(below.text_style(Some("h1")).unwrap().font_size(), 60.0);
}

#[test]
fn frames_and_plain_boxes_do_not_left_align() {
    let (theme, styles) = table();
    let cache = QueryCache::new();
    let ctx = LayoutCtx::for_render(&theme, &styles, &cache, 1)
        .enter(Ancestor::Frame, None)
        .enter(Ancestor::Box(BoxRole::FrameBody), None);
    assert_eq!(ctx.text_style(None).unwrap().alignment(), Align::Center);

    let column = ctx.enter(Ancestor::Box(BoxRole::Column), None);
    assert_eq!(column.text_style(None).unwrap().alignment(), Align::Left);
}

#[test]
fn entering_leaves_the_parent_untouched() {
    let (theme, styles) = table();
    let cache = QueryCache::new();
    let root = LayoutCtx::for_render(&theme, &styles, &cache, 1);
    let child = root.enter(Ancestor::Frame, None);
    assert!(root.ancestors().is_empty());
    assert_eq!(child.ancestors(), &[Ancestor::Frame]);
}

#[test]
fn unknown_role_is_a_construction_error() {
    let (theme, styles) = table();
    let cache = QueryCache::new();
    let ctx = LayoutCtx::for_render(&theme, &styles, &cache, 1);
    assert!(matches!(
        ctx.text_style(Some("missing")),
        Err(DeckError::Construction(_))
    ));
}

#[test]
fn query_then_size_uses_the_same_key() {
    let (theme, styles) = table();
    let measurer: Arc<dyn TextMeasurer> = Arc::new(CountingChars);
    let discovery = LayoutCtx::for_discovery(&theme, &styles, &measurer);
    let tokens = crate::text::markup::parse_markup("two\nlines");

    let query = discovery.text_query(&tokens, Some("h2")).unwrap();
    let key = query.key().clone();
    assert!(key.as_str().starts_with("textsize:<svg"));
    let measured = query.resolve().unwrap();
    assert!((measured.height - 88.0).abs() < 1e-9);

    let mut cache = QueryCache::new();
    cache.insert(key, measured);
    let render = LayoutCtx::for_render(&theme, &styles, &cache, 1);
    let (w, h) = render.text_size(&tokens, Some("h2")).unwrap();
    assert_eq!(w, measured.width + 20.0);
    assert!((h - (measured.height + 40.0 / 3.0)).abs() < 1e-9);

    // A render context has no measurement source.
    assert!(matches!(
        render.text_query(&tokens, None),
        Err(DeckError::Query { .. })
    ));
}
