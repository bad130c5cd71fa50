//! Lexer for the brace marker syntax using logos
//!
//! Every prefix of a marker is itself an accepting pattern (`{name` lexes as
//! [`Token::Unterminated`]), so the lexer never has to backtrack: an
//! unfinished marker is reported instead of silently passing through.

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Contents of a `{name}` or `{name:spec}` marker
#[derive(Debug, Clone, PartialEq)]
pub struct RawMarker {
    pub name: String,
    pub spec: Option<String>,
}

fn split_marker(inner: &str) -> RawMarker {
    match inner.split_once(':') {
        Some((name, spec)) => RawMarker {
            name: name.to_string(),
            spec: Some(spec.to_string()),
        },
        None => RawMarker {
            name: inner.to_string(),
            spec: None,
        },
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Escapes (longer patterns win over single braces)
    #[token("{{")]
    EscapedOpen,
    #[token("}}")]
    EscapedClose,

    #[regex(r"\{[A-Za-z_][A-Za-z0-9_]*(:[^{}]*)?\}", |lex| {
        let s = lex.slice();
        split_marker(&s[1..s.len() - 1])
    })]
    Marker(RawMarker),

    // A marker that never reaches its closing brace
    #[regex(r"\{[A-Za-z_][A-Za-z0-9_]*(:[^{}]*)?", |lex| lex.slice()[1..].to_string())]
    Unterminated(String),

    // Braces that cannot start or end a marker are plain text
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,

    #[regex(r"[^{}]+", |lex| lex.slice().to_string())]
    Text(String),
}

/// Lex template source into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input).spanned().map(move |(tok, span)| match tok {
        Ok(t) => (t, span),
        // Unreachable with the patterns above; keep the bytes rather than drop them
        Err(()) => (Token::Text(input[span.clone()].to_string()), span),
    })
}
