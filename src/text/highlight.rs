use crate::foundation::error::DeckResult;
use crate::text::markup::{Token, normalize_tokens};

/// Source of styled token streams for code blocks.
///
/// Implementations tag runs with `Begin(style)`/`End` pairs; every style name they emit must be
/// present in the deck's style table (see `Slides::set_style`).
pub trait Highlighter: Send + Sync {
    /// Tokenize `code` written in `language`.
    fn highlight(&self, code: &str, language: &str) -> DeckResult<Vec<Token>>;
}

/// Highlighter that emits the code verbatim, without style runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, code: &str, _language: &str) -> DeckResult<Vec<Token>> {
        let mut tokens = Vec::new();
        for (idx, line) in code.split('\n').enumerate() {
            if idx > 0 {
                tokens.push(Token::Newline(1));
            }
            tokens.push(Token::Text(line.to_string()));
        }
        Ok(normalize_tokens(tokens))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/highlight.rs"]
mod tests;
