//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::TemplateError;
use crate::format::NumberFormat;
use crate::parser::ast::*;
use crate::parser::lexer::{RawMarker, Token};
use crate::parser::legacy;

/// Segment before its format spec has been checked
#[derive(Debug, Clone)]
enum RawSegment {
    Literal(String),
    Marker(RawMarker),
}

/// Parse template source written in the given marker syntax
pub fn parse(
    name: impl Into<String>,
    source: impl Into<String>,
    syntax: MarkerSyntax,
) -> Result<Template, TemplateError> {
    let name = name.into();
    let source = source.into();

    let segments = match syntax {
        MarkerSyntax::Brace => parse_brace(&source)?,
        MarkerSyntax::Legacy => legacy::segments(&source),
    };

    tracing::debug!(
        template = %name,
        %syntax,
        segments = segments.len(),
        "parsed template"
    );

    Ok(Template {
        name,
        syntax,
        source,
        segments,
    })
}

fn parse_brace(input: &str) -> Result<Vec<Spanned<Segment>>, TemplateError> {
    let len = input.len();

    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    let raw = template_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => TemplateError::from(err),
            None => TemplateError::malformed(0..len, "template could not be parsed"),
        })?;

    raw.into_iter().map(check_format).collect()
}

/// Resolve the format spec of a marker; a bad spec makes the template malformed
fn check_format(seg: Spanned<RawSegment>) -> Result<Spanned<Segment>, TemplateError> {
    let node = match seg.node {
        RawSegment::Literal(text) => Segment::Literal(text),
        RawSegment::Marker(RawMarker { name, spec }) => {
            // `{name:}` is the same marker as `{name}`
            let spec = spec.filter(|s| !s.trim().is_empty());
            let format = match &spec {
                Some(s) => Some(
                    s.parse::<NumberFormat>()
                        .map_err(|e| TemplateError::malformed(seg.span.clone(), e.to_string()))?,
                ),
                None => None,
            };
            Segment::Placeholder(Placeholder {
                name: Identifier::new(name),
                format,
                raw_spec: spec,
            })
        }
    };
    Ok(Spanned::new(node, seg.span))
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn template_parser<'a, I>(
) -> impl Parser<'a, I, Vec<Spanned<RawSegment>>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let literal = select! {
        Token::Text(s) => s,
        Token::EscapedOpen => "{".to_string(),
        Token::EscapedClose => "}".to_string(),
        Token::OpenBrace => "{".to_string(),
        Token::CloseBrace => "}".to_string(),
    }
    .map(RawSegment::Literal);

    let marker = select! {
        Token::Marker(m) => m,
    }
    .map(RawSegment::Marker);

    // Token::Unterminated matches neither alternative and stops the template
    literal
        .or(marker)
        .map_with(|seg, e| Spanned::new(seg, span_range(&e.span())))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brace(source: &str) -> Result<Template, TemplateError> {
        parse("test", source, MarkerSyntax::Brace)
    }

    fn literal_text(template: &Template) -> String {
        template
            .segments
            .iter()
            .filter_map(|s| match &s.node {
                Segment::Literal(t) => Some(t.as_str()),
                Segment::Placeholder(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_and_plain() {
        let t = brace("no markers here").unwrap();
        assert!(t.placeholders().is_empty());
        assert_eq!(literal_text(&t), "no markers here");
    }

    #[test]
    fn test_placeholders_in_order() {
        let t = brace("{b} {a} {b:.2}").unwrap();
        let names: Vec<_> = t.placeholders().iter().map(|i| i.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(t.markers().count(), 3);
    }

    #[test]
    fn test_format_spec_parsed() {
        let t = brace("ts={hil_ts:.6}").unwrap();
        let p = t.markers().next().unwrap();
        assert_eq!(p.node.format, Some(NumberFormat::Fixed(6)));
        assert_eq!(p.node.raw_spec.as_deref(), Some(".6"));
        assert_eq!(p.span, 3..14);
    }

    #[test]
    fn test_escapes_become_literals() {
        let t = brace("columns={{2}}").unwrap();
        assert_eq!(literal_text(&t), "columns={2}");
        assert!(t.placeholders().is_empty());
    }

    #[test]
    fn test_unterminated_marker_is_malformed() {
        let err = brace("speed={target_speed").unwrap_err();
        match err {
            TemplateError::Malformed { span, message } => {
                assert_eq!(span, 6..19);
                assert!(message.contains("target_speed"), "{}", message);
            }
            other => panic!("expected malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_ambiguous_marker_is_malformed() {
        let err = brace("x = {a b}").unwrap_err();
        assert!(matches!(err, TemplateError::Malformed { span, .. } if span == (4..6)));
    }

    #[test]
    fn test_bad_format_spec_is_malformed() {
        let err = brace("{x:zz}").unwrap_err();
        assert!(matches!(err, TemplateError::Malformed { span, .. } if span == (0..6)));
    }

    #[test]
    fn test_empty_format_spec_is_no_spec() {
        let t = brace("{t:} {t: }").unwrap();
        for marker in t.markers() {
            assert_eq!(marker.node.format, None);
            assert_eq!(marker.node.raw_spec, None);
        }
    }

    #[test]
    fn test_legacy_syntax() {
        let t = parse("legacy", "%controller% <replace> {1}", MarkerSyntax::Legacy).unwrap();
        let names: Vec<_> = t.placeholders().iter().map(|i| i.as_str()).collect();
        assert_eq!(names, vec!["controller", "replace"]);
        assert_eq!(literal_text(&t), "  {1}");
    }
}
