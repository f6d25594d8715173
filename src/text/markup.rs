/// One token of a styled text stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// Literal text run (no newlines).
    Text(String),
    /// `n` consecutive line breaks.
    Newline(u32),
    /// Start of a run styled with the named style.
    Begin(String),
    /// End of the innermost styled run.
    End,
}

/// Delimiters of the annotated-string syntax `~name{...}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkupChars {
    /// Introduces a style name.
    pub escape: char,
    /// Opens the styled run.
    pub open: char,
    /// Closes the styled run.
    pub close: char,
}

impl Default for MarkupChars {
    fn default() -> Self {
        Self {
            escape: '~',
            open: '{',
            close: '}',
        }
    }
}

/// Parse an annotated string with the default delimiters.
pub fn parse_markup(text: &str) -> Vec<Token> {
    parse_markup_with(text, MarkupChars::default())
}

/// Parse an annotated string into a normalized token stream.
///
/// `~name{...}` wraps a run in `Begin(name)`/`End`; runs nest. Closers without an open run are
/// literal text and runs still open at the end of input are closed.
pub fn parse_markup_with(text: &str, chars: MarkupChars) -> Vec<Token> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut depth = 0usize;
    let mut it = text.chars().peekable();

    while let Some(c) = it.next() {
        if c == '\n' {
            flush(&mut out, &mut buf);
            out.push(Token::Newline(1));
        } else if c == chars.escape {
            let mut name = String::new();
            while let Some(&n) = it.peek() {
                if n.is_alphanumeric() || n == '_' || n == '.' || n == '-' {
                    name.push(n);
                    it.next();
                } else {
                    break;
                }
            }
            if !name.is_empty() && it.peek() == Some(&chars.open) {
                it.next();
                flush(&mut out, &mut buf);
                out.push(Token::Begin(name));
                depth += 1;
            } else {
                buf.push(c);
                buf.push_str(&name);
            }
        } else if c == chars.close && depth > 0 {
            flush(&mut out, &mut buf);
            out.push(Token::End);
            depth -= 1;
        } else {
            buf.push(c);
        }
    }
    flush(&mut out, &mut buf);
    out.extend(std::iter::repeat_n(Token::End, depth));
    normalize_tokens(out)
}

/// Merge adjacent newline and text tokens, drop empty text and trailing newlines.
pub fn normalize_tokens(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match (out.last_mut(), token) {
            (_, Token::Text(t)) if t.is_empty() => {}
            (Some(Token::Newline(n)), Token::Newline(m)) => *n += m,
            (Some(Token::Text(prev)), Token::Text(t)) => prev.push_str(&t),
            (_, token) => out.push(token),
        }
    }
    while matches!(out.last(), Some(Token::Newline(_))) {
        out.pop();
    }
    out
}

/// Number of rendered lines in a token stream.
pub fn line_count(tokens: &[Token]) -> u32 {
    1 + tokens
        .iter()
        .map(|t| match t {
            Token::Newline(n) => *n,
            _ => 0,
        })
        .sum::<u32>()
}

fn flush(out: &mut Vec<Token>, buf: &mut String) {
    if !buf.is_empty() {
        out.push(Token::Text(std::mem::take(buf)));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/markup.rs"]
mod tests;
