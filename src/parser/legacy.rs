//! Legacy `%name%` / `<name>` marker syntax
//!
//! Older model templates were filled in with `sed` and used two marker
//! forms. They are accepted only when a template declares
//! [`MarkerSyntax::Legacy`](super::ast::MarkerSyntax) and can be rewritten
//! into the brace syntax with [`migrate`].

use logos::Logos;

use super::ast::{Identifier, Placeholder, Segment, Spanned};
use super::lexer::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum LegacyToken {
    #[regex(r"%[A-Za-z_][A-Za-z0-9_]*%", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    Percent(String),

    #[regex(r"<[A-Za-z_][A-Za-z0-9_]*>", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    Angle(String),

    // Anything that does not complete a marker, including `%name` and `a<b`
    #[regex(r"%[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    #[regex(r"<[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    #[token("%", |lex| lex.slice().to_string())]
    #[token("<", |lex| lex.slice().to_string())]
    #[regex(r"[^%<]+", |lex| lex.slice().to_string())]
    Text(String),
}

/// Lex legacy template source into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (LegacyToken, Span)> + '_ {
    LegacyToken::lexer(input)
        .spanned()
        .map(move |(tok, span)| match tok {
            Ok(t) => (t, span),
            Err(()) => (LegacyToken::Text(input[span.clone()].to_string()), span),
        })
}

/// Split legacy source into segments. Legacy markers cannot be malformed.
pub fn segments(input: &str) -> Vec<Spanned<Segment>> {
    lex(input)
        .map(|(tok, span)| {
            let segment = match tok {
                LegacyToken::Percent(name) | LegacyToken::Angle(name) => {
                    Segment::Placeholder(Placeholder {
                        name: Identifier::new(name),
                        format: None,
                        raw_spec: None,
                    })
                }
                LegacyToken::Text(text) => Segment::Literal(text),
            };
            Spanned::new(segment, span)
        })
        .collect()
}

/// Rewrite a legacy template into the brace syntax.
///
/// Markers become `{name}` and literal braces are doubled, so rendering the
/// result as brace syntax matches rendering the original as legacy syntax.
pub fn migrate(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    for (tok, _) in lex(input) {
        match tok {
            LegacyToken::Percent(name) | LegacyToken::Angle(name) => {
                out.push('{');
                out.push_str(&name);
                out.push('}');
            }
            LegacyToken::Text(text) => {
                for c in text.chars() {
                    match c {
                        '{' => out.push_str("{{"),
                        '}' => out.push_str("}}"),
                        _ => out.push(c),
                    }
                }
            }
        }
    }
    out
}
