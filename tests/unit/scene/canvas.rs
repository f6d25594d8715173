use super::*;
use crate::text::markup::parse_markup;

fn styles() -> StyleTable {
    let mut table = StyleTable::new();
    table.insert("emph".to_string(), TextStyle::new().color("orange"));
    table
}

#[test]
fn page_is_an_svg_document_with_size() {
    let mut page = PageCanvas::new(300, 200);
    page.draw_rect(Rect::new(0.0, 0.0, 100.0, 50.0), "red");
    let svg = page.finish().unwrap();
    assert!(
        svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="200">"#)
    );
    assert!(svg.contains(r#"<rect x="0" y="0" width="100" height="50" style="fill:red"/>"#));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn unpainted_rect_is_stroked_black() {
    let mut page = PageCanvas::new(10, 10);
    page.draw_rect_with(Rect::new(1.0, 2.0, 3.0, 4.0), &RectPaint::default());
    assert!(page.finish().unwrap().contains(r#"style="stroke:black""#));
}

#[test]
fn text_lines_advance_by_line_height() {
    let mut page = PageCanvas::new(100, 100);
    let style = TextStyle::new().size(20.0).line_spacing(1.5);
    page.draw_text(5.0, 25.0, &parse_markup("a\n\nb"), &style, &styles())
        .unwrap();
    let svg = page.finish().unwrap();
    assert!(svg.contains(r#"dy="60""#), "{svg}");
    assert!(svg.contains(r#"text-anchor="start""#));
}

#[test]
fn measure_document_is_deterministic_and_style_sensitive() {
    let tokens = parse_markup("Hello ~emph{world}");
    let style = TextStyle::new().size(30.0).font("Ubuntu");
    let a = text_measure_svg(&tokens, &style, &styles()).unwrap();
    let b = text_measure_svg(&tokens, &style, &styles()).unwrap();
    assert_eq!(a, b);
    assert!(a.contains(r#"id="t1""#));
    assert!(a.contains("fill:orange;"));

    let bigger = text_measure_svg(&tokens, &style.clone().size(31.0), &styles()).unwrap();
    assert_ne!(a, bigger);
}

#[test]
fn unknown_style_name_is_a_construction_error() {
    let err = text_measure_svg(&parse_markup("~nope{x}"), &TextStyle::new(), &styles())
        .unwrap_err();
    assert!(matches!(err, DeckError::Construction(_)));
}

#[test]
fn image_is_translated_and_scaled() {
    let mut page = PageCanvas::new(10, 10);
    page.draw_image("<svg/>", 3.0, 4.0, Some(0.5));
    page.draw_image("<svg/>", 1.0, 2.0, Some(1.0));
    let svg = page.finish().unwrap();
    assert!(svg.contains(r#"<g transform="translate(3, 4) scale(0.5)"><svg/></g>"#));
    assert!(svg.contains(r#"<g transform="translate(1, 2)"><svg/></g>"#));
}
