use super::*;

#[test]
fn empty_element_self_closes() {
    let mut xml = XmlWriter::new();
    xml.element("test");
    xml.close();
    assert_eq!(xml.finish().unwrap(), "<test/>");
}

#[test]
fn attributes_are_written_in_order_and_escaped() {
    let mut xml = XmlWriter::new();
    xml.element("test");
    xml.set("x", 10);
    xml.set("abc-xyz", 20.5);
    xml.set("q", "it's \"a\" <b>");
    xml.close();
    assert_eq!(
        xml.finish().unwrap(),
        r#"<test x="10" abc-xyz="20.5" q="it&apos;s &quot;a&quot; &lt;b&gt;"/>"#
    );
}

#[test]
fn children_and_text_are_escaped_and_ordered() {
    let mut xml = XmlWriter::new();
    xml.element("test");
    xml.element("a");
    xml.text("<not-a-tag>");
    xml.close();
    xml.text("abc");
    xml.element("a");
    xml.text("xyz");
    xml.close();
    xml.text("123");
    xml.close();
    assert_eq!(
        xml.finish().unwrap(),
        "<test><a>&lt;not-a-tag&gt;</a>abc<a>xyz</a>123</test>"
    );
}

#[test]
fn attributes_after_content_are_ignored() {
    let mut xml = XmlWriter::new();
    xml.element("a");
    xml.text("x");
    xml.set("late", 1);
    assert_eq!(xml.finish().unwrap(), "<a>x</a>");
}

#[test]
fn finish_closes_open_elements_and_raw_is_verbatim() {
    let mut xml = XmlWriter::new();
    xml.element("g");
    xml.raw("<rect/>");
    xml.element("b");
    assert_eq!(xml.depth(), 2);
    assert_eq!(xml.finish().unwrap(), "<g><rect/><b/></g>");
}
