use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DeckError::construction("x")
            .to_string()
            .contains("construction error:")
    );
    assert!(
        DeckError::query("k", "x")
            .to_string()
            .contains("query error for key k:")
    );
    assert!(DeckError::cache_io("x").to_string().contains("cache io error:"));
    assert!(
        DeckError::arrangement("x")
            .to_string()
            .contains("arrangement error:")
    );
    assert!(
        DeckError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn external_tool_reports_command() {
    let err = DeckError::external_tool("inkscape --pipe", "exit status 1");
    let msg = err.to_string();
    assert!(msg.contains("inkscape --pipe"));
    assert!(msg.contains("exit status 1"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DeckError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
