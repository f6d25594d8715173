use super::*;

const STEPPED: &str = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="10mm" height="200">
  <rect id="base" width="5" height="5"/>
  <g id="outer" inkscape:label="layer **3-5">
    <rect id="inner" inkscape:label="**1"/>
  </g>
  <text id="late" inkscape:label="x**7">A &amp; B</text>
</svg>"#;

#[test]
fn labels_parse_single_steps_and_ranges() {
    assert_eq!(
        parse_step_label("x**3-5"),
        Some(StepLabel {
            start: 3,
            end: Some(5)
        })
    );
    assert_eq!(
        parse_step_label("x**7"),
        Some(StepLabel {
            start: 7,
            end: None
        })
    );
    assert_eq!(parse_step_label("** 4 "), Some(StepLabel { start: 4, end: None }));
    assert_eq!(parse_step_label("layer 3-5"), None);
    assert_eq!(parse_step_label("**abc"), None);
    assert_eq!(parse_step_label("**3-"), None);
}

#[test]
fn size_and_inner_steps_are_derived() {
    let scene = SceneGraph::parse(STEPPED).unwrap();
    assert!((scene.width() - 35.43307).abs() < 1e-9);
    assert_eq!(scene.height(), 200.0);
    assert!(scene.has_annotations());
    assert_eq!(scene.max_inner_step(), 7);
}

#[test]
fn excluded_elements_drop_with_their_subtree() {
    let scene = SceneGraph::parse(STEPPED).unwrap();

    let first = scene.view_at(1).unwrap();
    assert!(first.contains("id=\"base\""));
    assert!(!first.contains("id=\"outer\""));
    assert!(!first.contains("id=\"inner\""));
    assert!(!first.contains("id=\"late\""));

    let mid = scene.view_at(4).unwrap();
    assert!(mid.contains("id=\"outer\""));
    assert!(mid.contains("id=\"inner\""));
    assert!(!mid.contains("id=\"late\""));

    let last = scene.view_at(7).unwrap();
    assert!(!last.contains("id=\"outer\""));
    assert!(last.contains("A &amp; B"));
}

#[test]
fn unannotated_graph_is_emitted_unchanged_at_every_step() {
    let scene = SceneGraph::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="30"><circle r="3"/></svg>"#,
    )
    .unwrap();
    assert!(!scene.has_annotations());
    assert_eq!(scene.max_inner_step(), 1);
    assert_eq!(scene.view_at(1).unwrap(), scene.markup());
    assert_eq!(scene.view_at(9).unwrap(), scene.markup());
    assert_eq!(
        scene.markup(),
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="30"><circle r="3"/></svg>"#
    );
}

#[test]
fn malformed_sources_are_construction_errors() {
    for bad in [
        "<svg width='1'><g></svg>",
        "<svg width='1' height='2'><g>",
        "<svg height='2'/>",
        "<html width='1' height='1'/>",
        "<svg width='wide' height='1'/>",
    ] {
        assert!(
            matches!(SceneGraph::parse(bad), Err(DeckError::Construction(_))),
            "accepted {bad}"
        );
    }
}

#[test]
fn lengths_convert_units() {
    assert_eq!(string_to_pixels("100").unwrap(), 100.0);
    assert_eq!(string_to_pixels("12px").unwrap(), 12.0);
    assert!((string_to_pixels("2cm").unwrap() - 70.86614).abs() < 1e-9);
}

#[test]
fn pruned_views_keep_original_quoting_and_cdata() {
    let scene = SceneGraph::parse(
        "<svg width='4' height='3'><style><![CDATA[a > b {}]]></style><g id='x' label=\"**2\"/></svg>",
    )
    .unwrap();
    assert_eq!(
        scene.view_at(1).unwrap(),
        "<svg width='4' height='3'><style><![CDATA[a > b {}]]></style></svg>"
    );
    assert_eq!(scene.view_at(2).unwrap(), scene.markup());
    assert!(scene.markup().ends_with("<g id='x' label=\"**2\"/></svg>"));
}
