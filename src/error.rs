//! Error types for parsing and rendering templates

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// A placeholder has no value in the parameter set
    #[error("missing parameter '{key}'")]
    MissingParameter { key: String, span: Span },

    /// A marker that cannot be parsed unambiguously
    #[error("malformed template at {}..{}: {message}", span.start, span.end)]
    Malformed { span: Span, message: String },

    /// A number format applied to a text value
    #[error("format '{spec}' cannot be applied to text parameter '{key}'")]
    FormatMismatch { key: String, spec: String, span: Span },

    /// Parameters the template never references (only when unused keys are denied)
    #[error("unused parameters: {}", keys.join(", "))]
    UnusedParameters { keys: Vec<String> },
}

impl TemplateError {
    pub fn malformed(span: Span, message: impl Into<String>) -> Self {
        Self::Malformed {
            span,
            message: message.into(),
        }
    }

    /// Location of the error in the template source, if it has one
    pub fn span(&self) -> Option<&Span> {
        match self {
            TemplateError::MissingParameter { span, .. }
            | TemplateError::Malformed { span, .. }
            | TemplateError::FormatMismatch { span, .. } => Some(span),
            TemplateError::UnusedParameters { .. } => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        self.format_with_color(source, filename, true)
    }

    /// Format the error with source context, optionally without ANSI colors
    pub fn format_with_color(&self, source: &str, filename: &str, color: bool) -> String {
        let Some(span) = self.span() else {
            return format!("Error: {}", self);
        };

        // ariadne counts characters, spans count bytes
        let start = char_offset(source, span.start);
        let end = char_offset(source, span.end);

        let label = match self {
            TemplateError::MissingParameter { .. } => "no value supplied for this placeholder",
            TemplateError::Malformed { .. } => "cannot parse this marker",
            TemplateError::FormatMismatch { .. } => "value is text",
            TemplateError::UnusedParameters { .. } => "",
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, start)
            .with_config(Config::default().with_color(color))
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, start..end))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("Error: {}", self),
        }
    }
}

fn char_offset(source: &str, byte: usize) -> usize {
    let byte = byte.min(source.len());
    source
        .char_indices()
        .take_while(|(i, _)| *i < byte)
        .count()
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for TemplateError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match (err.reason(), err.found()) {
            (RichReason::Custom(msg), _) => msg.to_string(),
            (_, Some(Token::Unterminated(raw))) => format!(
                "unterminated placeholder '{{{}': expected '}}' after the name",
                raw
            ),
            (_, Some(tok)) => format!("unexpected {}", format_token(tok)),
            (_, None) => "unexpected end of template".to_string(),
        };

        TemplateError::Malformed {
            span: err.span().into_range(),
            message,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Text(_) => "text".to_string(),
        Token::Marker(m) => format!("placeholder '{}'", m.name),
        Token::Unterminated(raw) => format!("unterminated placeholder '{{{}'", raw),
        Token::EscapedOpen => "'{{'".to_string(),
        Token::EscapedClose => "'}}'".to_string(),
        Token::OpenBrace => "'{'".to_string(),
        Token::CloseBrace => "'}'".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_accessor() {
        let err = TemplateError::MissingParameter {
            key: "b".to_string(),
            span: 4..7,
        };
        assert_eq!(err.span(), Some(&(4..7)));
        let unused = TemplateError::UnusedParameters {
            keys: vec!["x".to_string()],
        };
        assert_eq!(unused.span(), None);
    }

    #[test]
    fn test_display_names_key() {
        let err = TemplateError::MissingParameter {
            key: "target_speed_rad_per_s".to_string(),
            span: 0..1,
        };
        assert_eq!(err.to_string(), "missing parameter 'target_speed_rad_per_s'");
    }

    #[test]
    fn test_format_includes_source_line() {
        let source = "poles={motor_poles}\n";
        let err = TemplateError::MissingParameter {
            key: "motor_poles".to_string(),
            span: 6..19,
        };
        let report = err.format_with_color(source, "model.mo", false);
        assert!(!report.contains('\u{1b}'));
        assert!(report.contains("missing parameter 'motor_poles'"));
        assert!(report.contains("model.mo"));
        assert!(report.contains("poles={motor_poles}"));
    }

    #[test]
    fn test_char_offset_handles_multibyte() {
        let source = "→ {a}";
        assert_eq!(char_offset(source, 4), 2);
        assert_eq!(char_offset(source, source.len()), 5);
    }
}
