use super::*;

const STEPPED: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="200" height="100">
  <g id="intro" inkscape:label="**1-2"/>
  <g id="detail" inkscape:label="**3-5"/>
  <g id="final" inkscape:label="**7"/>
</svg>"#;

#[test]
fn steps_are_shifted_by_the_start_step() {
    let mut image = ImageNode::from_svg(STEPPED, None).unwrap();
    assert_eq!(image.max_step(), 7);

    image.show(3u32..).unwrap();
    assert_eq!(image.max_step(), 9);
    assert_eq!(image.inner_step(3), 1);
    assert_eq!(image.inner_step(6), 4);

    let at_start = image.markup_at(3).unwrap();
    assert!(at_start.contains("id=\"intro\""));
    assert!(!at_start.contains("id=\"detail\""));

    let later = image.markup_at(6).unwrap();
    assert!(!later.contains("id=\"intro\""));
    assert!(later.contains("id=\"detail\""));
    assert!(!later.contains("id=\"final\""));

    assert!(image.markup_at(9).unwrap().contains("id=\"final\""));
}

#[test]
fn scale_applies_to_displayed_size() {
    let image = ImageNode::from_svg(STEPPED, Some(0.5)).unwrap();
    assert_eq!(image.width(), 100.0);
    assert_eq!(image.height(), 50.0);
    assert_eq!(image.scale(), Some(0.5));
}

#[test]
fn invalid_sources_are_construction_errors() {
    assert!(matches!(
        ImageNode::from_svg(STEPPED, Some(0.0)),
        Err(DeckError::Construction(_))
    ));
    assert!(matches!(
        ImageNode::load("/definitely/not/here.svg", None),
        Err(DeckError::Construction(_))
    ));
    assert!(matches!(
        ImageNode::from_svg("<svg width='1'>", None),
        Err(DeckError::Construction(_))
    ));
}

#[test]
fn loaded_images_remember_their_path() {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!(
        "stepdeck_image_{}_{nanos}.svg",
        std::process::id()
    ));
    std::fs::write(&path, STEPPED).unwrap();
    let image = ImageNode::load(&path, None).unwrap();
    assert_eq!(image.path(), Some(path.as_path()));
    assert_eq!(image.width(), 200.0);
    let _ = std::fs::remove_file(&path);
}
