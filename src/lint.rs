//! Advisory checks on a template and the parameters bound to it.
//!
//! Nothing here stops a render. Callers decide whether to print the
//! warnings, ignore them, or (for unused parameters) turn them into an error
//! through [`RenderConfig::deny_unused`](crate::RenderConfig).

use std::collections::HashMap;
use std::fmt;

use crate::format::NumberFormat;
use crate::params::ParameterSet;
use crate::parser::ast::Template;

/// A lint warning about a template/parameter mismatch
#[derive(Debug, Clone, PartialEq)]
pub struct LintWarning {
    pub category: LintCategory,
    /// Parameter the warning is about
    pub key: String,
    pub message: String,
}

/// Category of lint warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    /// A supplied key the template never references
    UnusedParameter,
    /// The same key rendered with different format specs
    InconsistentFormat,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::UnusedParameter => write!(f, "unused-parameter"),
            LintCategory::InconsistentFormat => write!(f, "inconsistent-format"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Run all lint checks
pub fn check(template: &Template, params: &ParameterSet) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_unused(template, params, &mut warnings);
    check_formats(template, &mut warnings);
    warnings
}

/// Keys in `params` that `template` never references, sorted
pub fn unused_keys<'p>(template: &Template, params: &'p ParameterSet) -> Vec<&'p str> {
    params
        .keys()
        .into_iter()
        .filter(|key| !template.references(key))
        .collect()
}

fn check_unused(template: &Template, params: &ParameterSet, warnings: &mut Vec<LintWarning>) {
    for key in unused_keys(template, params) {
        warnings.push(LintWarning {
            category: LintCategory::UnusedParameter,
            key: key.to_string(),
            message: format!(
                "parameter '{}' is not referenced by template '{}'",
                key, template.name
            ),
        });
    }
}

fn check_formats(template: &Template, warnings: &mut Vec<LintWarning>) {
    // First format seen per key, with its spec as written; `None` is the render default
    let mut first: HashMap<&str, (Option<NumberFormat>, Option<&str>)> = HashMap::new();
    let mut reported: Vec<&str> = Vec::new();

    for marker in template.markers() {
        let name = marker.node.name.as_str();
        let format = marker.node.format;
        let spec = marker.node.raw_spec.as_deref();
        match first.get(name) {
            None => {
                first.insert(name, (format, spec));
            }
            Some(&(prev_format, prev)) if prev_format != format && !reported.contains(&name) => {
                reported.push(name);
                warnings.push(LintWarning {
                    category: LintCategory::InconsistentFormat,
                    key: name.to_string(),
                    message: format!(
                        "placeholder '{}' is formatted as '{}' and as '{}'",
                        name,
                        prev.unwrap_or("default"),
                        spec.unwrap_or("default")
                    ),
                });
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, MarkerSyntax};

    fn template(source: &str) -> Template {
        parse("lint", source, MarkerSyntax::Brace).expect("Should parse")
    }

    #[test]
    fn test_clean_template_no_warnings() {
        let t = template("{a} {b:.2} {b:.2}");
        let params = ParameterSet::new().with("a", 1).with("b", 2.0);
        assert!(check(&t, &params).is_empty());
    }

    #[test]
    fn test_unused_parameters_sorted() {
        let t = template("{a}");
        let params = ParameterSet::new().with("z", 1).with("a", 1).with("m", 1);
        let warnings = check(&t, &params);
        let keys: Vec<_> = warnings.iter().map(|w| w.key.as_str()).collect();
        assert_eq!(keys, vec!["m", "z"]);
        assert!(warnings
            .iter()
            .all(|w| w.category == LintCategory::UnusedParameter));
    }

    #[test]
    fn test_inconsistent_format_reported_once() {
        let t = template("{ts} {ts:.3} {ts:.6}");
        let warnings = check(&t, &ParameterSet::new().with("ts", 0.1));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, LintCategory::InconsistentFormat);
        assert_eq!(
            warnings[0].message,
            "placeholder 'ts' is formatted as 'default' and as '.3'"
        );
    }

    #[test]
    fn test_equivalent_specs_are_consistent() {
        let t = template("{a:.3} {a:.3f} {b:.2e} {b:.2e}");
        let params = ParameterSet::new().with("a", 1.0).with("b", 2.0);
        assert!(check(&t, &params).is_empty());
    }

    #[test]
    fn test_warning_display() {
        let t = template("");
        let warnings = check(&t, &ParameterSet::new().with("extra", 1));
        assert_eq!(
            warnings[0].to_string(),
            "[unused-parameter] parameter 'extra' is not referenced by template 'lint'"
        );
    }
}
