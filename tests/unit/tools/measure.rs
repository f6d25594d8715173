use super::*;

const DOC: &str = "<svg xmlns='http://www.w3.org/2000/svg'><text id='t1' x='0' y='0' font-size='30'><tspan>Hello measurement</tspan></text></svg>";

#[test]
fn empty_font_database_cannot_measure() {
    let measurer = UsvgMeasurer::from_fontdb(Arc::new(usvg::fontdb::Database::new()));
    let err = measurer.text_width(DOC, "t1").unwrap_err();
    assert!(matches!(err, DeckError::ExternalTool { .. }));
}

#[test]
fn longer_text_measures_wider_when_fonts_exist() {
    let measurer = UsvgMeasurer::new();
    if measurer.fontdb().is_empty() {
        return;
    }
    let short = measurer.text_width(DOC, "t1").unwrap();
    let long = measurer
        .text_width(&DOC.replace("Hello measurement", "Hello measurement, much longer"), "t1")
        .unwrap();
    assert!(short > 0.0);
    assert!(long > short);
    assert_eq!(measurer.text_width(DOC, "t1").unwrap(), short);
}

#[test]
fn missing_element_measures_zero() {
    let measurer = UsvgMeasurer::new();
    if measurer.fontdb().is_empty() {
        return;
    }
    assert_eq!(measurer.text_width(DOC, "nope").unwrap(), 0.0);
}

#[cfg(unix)]
#[test]
fn subprocess_measurer_parses_stdout() {
    let measurer = InkscapeMeasurer::with_command(ToolCommand::new(
        "sh",
        ["-c", "cat > /dev/null; echo '  42.5 '", "{id}"],
    ));
    assert_eq!(measurer.text_width(DOC, "t1").unwrap(), 42.5);

    let garbage = InkscapeMeasurer::with_command(ToolCommand::new(
        "sh",
        ["-c", "cat > /dev/null; echo wide"],
    ));
    let err = garbage.text_width(DOC, "t1").unwrap_err();
    assert!(err.to_string().contains("unparseable width"));
}

#[test]
fn monospaced_theme_fonts_fall_back_to_monospace_first() {
    use usvg::fontdb::Family;

    let requested = [usvg::FontFamily::Named("Ubuntu Mono".to_string())];
    assert_eq!(
        query_families(&requested),
        [
            Family::Name("Ubuntu Mono"),
            Family::Monospace,
            Family::SansSerif,
            Family::Serif
        ]
    );

    let requested = [usvg::FontFamily::Named("Ubuntu".to_string())];
    assert_eq!(
        query_families(&requested),
        [
            Family::Name("Ubuntu"),
            Family::SansSerif,
            Family::Serif,
            Family::Monospace
        ]
    );

    let requested = [usvg::FontFamily::Serif];
    assert_eq!(
        query_families(&requested),
        [Family::Serif, Family::SansSerif, Family::Monospace]
    );
}

#[test]
fn font_directories_are_searched_recursively() {
    let dir = std::env::temp_dir().join(format!(
        "stepdeck-fonts-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(dir.join("ubuntu")).unwrap();
    std::fs::write(dir.join("a.ttf"), b"not a font").unwrap();
    std::fs::write(dir.join("notes.txt"), b"skip me").unwrap();
    std::fs::write(dir.join("ubuntu").join("B.OTF"), b"not a font either").unwrap();

    let mut db = usvg::fontdb::Database::new();
    assert_eq!(load_fonts_from_dir(&mut db, &dir), 2);
    assert_eq!(load_fonts_from_dir(&mut db, &dir.join("missing")), 0);
    let _ = std::fs::remove_dir_all(&dir);
}
