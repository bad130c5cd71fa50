//! Placeholder substitution

use crate::error::TemplateError;
use crate::lint::{self, LintWarning};
use crate::params::{ParameterSet, ParameterValue};
use crate::parser::ast::{Placeholder, Segment, Span, Template};

use super::config::RenderConfig;

/// Output of a successful render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    /// Finished text, ready to be written wherever the caller wants
    pub text: String,
    /// Advisory findings; never fatal
    pub warnings: Vec<LintWarning>,
}

/// Render a parsed template against a parameter set.
///
/// Fails on the first placeholder (in source order) with no bound value.
/// Nothing is returned on failure, so output is never partially substituted.
pub fn render_template(
    template: &Template,
    params: &ParameterSet,
    config: &RenderConfig,
) -> Result<RenderedArtifact, TemplateError> {
    let mut text = String::with_capacity(template.source.len());

    for seg in &template.segments {
        match &seg.node {
            Segment::Literal(literal) => text.push_str(literal),
            Segment::Placeholder(placeholder) => {
                text.push_str(&substitute(placeholder, &seg.span, params, config)?);
            }
        }
    }

    if config.deny_unused {
        let unused = lint::unused_keys(template, params);
        if !unused.is_empty() {
            return Err(TemplateError::UnusedParameters {
                keys: unused.into_iter().map(str::to_string).collect(),
            });
        }
    }

    let warnings = lint::check(template, params);
    tracing::debug!(
        template = %template.name,
        bytes = text.len(),
        warnings = warnings.len(),
        "rendered template"
    );

    Ok(RenderedArtifact { text, warnings })
}

fn substitute(
    placeholder: &Placeholder,
    span: &Span,
    params: &ParameterSet,
    config: &RenderConfig,
) -> Result<String, TemplateError> {
    let key = placeholder.name.as_str();
    let value = params
        .get(key)
        .ok_or_else(|| TemplateError::MissingParameter {
            key: key.to_string(),
            span: span.clone(),
        })?;

    let format = match (placeholder.format, value) {
        (Some(_), ParameterValue::Text(_)) => {
            return Err(TemplateError::FormatMismatch {
                key: key.to_string(),
                spec: placeholder.raw_spec.clone().unwrap_or_default(),
                span: span.clone(),
            });
        }
        (Some(format), _) => format,
        (None, _) => config.float_format,
    };

    Ok(value.render(format))
}
