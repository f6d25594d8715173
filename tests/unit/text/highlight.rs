use super::*;

#[test]
fn plain_highlighter_keeps_markup_characters_literal() {
    let tokens = PlainHighlighter
        .highlight("let x = ~y{1};\n\nprint(x)", "rust")
        .unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Text("let x = ~y{1};".to_string()),
            Token::Newline(2),
            Token::Text("print(x)".to_string()),
        ]
    );
}
