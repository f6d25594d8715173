use super::*;

#[test]
fn default_style_defines_every_cascade_base_attribute() {
    let theme = Theme::default();
    let base = &theme.styles[names::DEFAULT];
    assert!(base.font.is_some());
    assert!(base.size.is_some());
    assert!(base.line_spacing.is_some());
    assert!(base.color.is_some());
    assert_eq!(base.align, Some(Align::Center));
    for name in [
        names::FRAME,
        names::FRAME_TITLE,
        names::LIST_ITEM,
        names::CODE,
        names::SHELL,
    ] {
        assert!(theme.styles.contains_key(name), "missing {name}");
    }
}

#[test]
fn user_styles_override_theme_entries_by_name() {
    let theme = Theme::blue();
    let mut overrides = StyleTable::new();
    overrides.insert("emph".to_string(), TextStyle::new().color("orange"));
    overrides.insert("mine".to_string(), TextStyle::new().bold(true));

    let table = theme.style_table(&overrides);
    assert_eq!(table["emph"].color.as_deref(), Some("orange"));
    assert_eq!(table["mine"].bold, Some(true));
    assert_eq!(table["h1"], theme.styles["h1"]);
}

#[test]
fn variants_differ_only_in_colors() {
    let a = Theme::default();
    let b = Theme::teal();
    assert_eq!(a.metrics, b.metrics);
    assert_ne!(a.palette.major, b.palette.major);
}
