use super::*;
use crate::text::highlight::Highlighter;

struct Upper;

impl Highlighter for Upper {
    fn highlight(&self, code: &str, _language: &str) -> DeckResult<Vec<Token>> {
        Ok(vec![
            Token::Begin("tt".to_string()),
            Token::Text(code.to_uppercase()),
            Token::End,
        ])
    }
}

#[test]
fn layers_collect_children_separately() {
    let mut root = BoxNode::new(BoxRole::Main);
    root.text("one");
    root.new_layer();
    root.text("two");
    root.text("three");
    assert_eq!(root.layers().len(), 2);
    assert_eq!(root.layers()[0].len(), 1);
    assert_eq!(root.layers()[1].len(), 2);
    assert_eq!(root.children().count(), 3);
}

#[test]
fn text_builders_trim_and_parse_markup() {
    let mut root = BoxNode::new(BoxRole::Main);
    let text = root.text("  Hello ~emph{world}\n ");
    assert_eq!(text.source(), "Hello ~emph{world}");
    assert_eq!(text.tokens()[1], Token::Begin("emph".to_string()));

    assert_eq!(root.h2("Title").role(), Some("h2"));
    assert_eq!(root.shell("$ ls").kind(), TextKind::Shell);

    let code = root.code_with(&Upper, " let x ", "rust").unwrap();
    assert_eq!(code.source(), "let x");
    assert_eq!(code.language(), Some("rust"));
    assert_eq!(code.tokens()[1], Token::Text("LET X".to_string()));
}

#[test]
fn lists_frames_and_columns_hold_role_tagged_boxes() {
    let mut root = BoxNode::new(BoxRole::Main);
    let list = root.list();
    list.item().text("a");
    list.item().text("b");
    assert_eq!(list.items().len(), 2);
    assert_eq!(list.items()[0].role(), BoxRole::ListItem);

    let frame = root.frame("My ~emph{frame}");
    frame.body_mut().text("inside");
    assert_eq!(frame.title(), "My ~emph{frame}");
    assert_eq!(frame.body().role(), BoxRole::FrameBody);
    assert_eq!(frame.body().children().count(), 1);

    let cols = root.columns();
    cols.column(2.0).text("left");
    cols.separator();
    cols.space(20.0, 0.0);
    cols.column(1.0);
    assert_eq!(cols.ratios(), &[2.0, 0.0, 0.0, 1.0]);
    assert!(matches!(&cols.columns()[0], Node::Box(b) if b.role() == BoxRole::Column));
    assert!(matches!(
        &cols.columns()[1],
        Node::Separator(s) if s.orientation() == Orientation::Vertical
    ));
}

#[test]
fn separators_and_spaces() {
    let mut root = BoxNode::new(BoxRole::Main);
    root.separator().with_thickness(5.0);
    let space = root.space(-3.0, 12.0);
    assert_eq!(space.width(), 0.0);
    assert_eq!(space.height(), 12.0);
    match root.children().next().unwrap() {
        Node::Separator(s) => {
            assert_eq!(s.orientation(), Orientation::Horizontal);
            assert_eq!(s.thickness(), Some(5.0));
        }
        other => panic!("unexpected node {other:?}"),
    }
}

#[test]
fn list_item_and_column_roles_cascade() {
    assert!(BoxRole::ListItem.cascades_list_item());
    assert!(BoxRole::Column.cascades_list_item());
    assert!(!BoxRole::Main.cascades_list_item());
    assert!(!BoxRole::FrameBody.cascades_list_item());
}
