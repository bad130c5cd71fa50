//! Parameter sets and parameter files
//!
//! A parameter set maps placeholder names to scalar values. Sets come from
//! TOML parameter files, `KEY=VALUE` assignments on the command line, or are
//! built directly by a driver.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::format::{FormatSpecError, NumberFormat};

/// Errors that can occur when loading parameters
#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("Failed to read parameter file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse parameter TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("parameter '{key}' has unsupported type {kind} (expected string, integer or float)")]
    UnsupportedValue { key: String, kind: &'static str },
    #[error("invalid assignment '{0}' (expected KEY=VALUE)")]
    InvalidAssignment(String),
    #[error(transparent)]
    InvalidFormat(#[from] FormatSpecError),
}

/// A scalar parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParameterValue {
    /// Type a command-line value: integer, then float, then text
    pub fn infer(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            return ParameterValue::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            if f.is_finite() {
                return ParameterValue::Float(f);
            }
        }
        ParameterValue::Text(raw.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, ParameterValue::Text(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParameterValue::Integer(_) => "integer",
            ParameterValue::Float(_) => "float",
            ParameterValue::Text(_) => "string",
        }
    }

    /// Text form of the value. Text values ignore the number format.
    pub fn render(&self, format: NumberFormat) -> String {
        match self {
            ParameterValue::Integer(i) => format.format_integer(*i),
            ParameterValue::Float(f) => format.format_float(*f),
            ParameterValue::Text(s) => s.clone(),
        }
    }

    fn from_toml(key: &str, value: toml::Value) -> Result<Self, ParamsError> {
        match value {
            toml::Value::Integer(i) => Ok(ParameterValue::Integer(i)),
            toml::Value::Float(f) if f.is_finite() => Ok(ParameterValue::Float(f)),
            toml::Value::Float(_) => Err(ParamsError::UnsupportedValue {
                key: key.to_string(),
                kind: "non-finite float",
            }),
            toml::Value::String(s) => Ok(ParameterValue::Text(s)),
            other => Err(ParamsError::UnsupportedValue {
                key: key.to_string(),
                kind: other.type_str(),
            }),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(NumberFormat::Shortest))
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        ParameterValue::Integer(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        ParameterValue::Integer(v.into())
    }
}

impl From<u32> for ParameterValue {
    fn from(v: u32) -> Self {
        ParameterValue::Integer(v.into())
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Float(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::Text(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        ParameterValue::Text(v)
    }
}

/// Mapping from placeholder name to value for one render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: HashMap<String, ParameterValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Bind a value, returning the one it replaces
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Option<ParameterValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Overlay another set; its values win
    pub fn merge(&mut self, other: ParameterSet) {
        self.values.extend(other.values);
    }

    /// Apply a `KEY=VALUE` assignment with the value typed by [`ParameterValue::infer`]
    pub fn assign(&mut self, assignment: &str) -> Result<(), ParamsError> {
        let (key, raw) = split_assignment(assignment)?;
        self.insert(key, ParameterValue::infer(raw));
        Ok(())
    }

    /// Apply a `KEY=VALUE` assignment keeping the value as text
    pub fn assign_text(&mut self, assignment: &str) -> Result<(), ParamsError> {
        let (key, raw) = split_assignment(assignment)?;
        self.insert(key, raw);
        Ok(())
    }
}

impl<K: Into<String>, V: Into<ParameterValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = ParameterSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

fn split_assignment(assignment: &str) -> Result<(&str, &str), ParamsError> {
    match assignment.split_once('=') {
        Some((key, value)) if is_identifier(key.trim()) => Ok((key.trim(), value)),
        _ => Err(ParamsError::InvalidAssignment(assignment.to_string())),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A parameter file: metadata, render defaults, and values
#[derive(Debug, Clone, Default)]
pub struct ParamsFile {
    /// Optional name for the parameter set
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Default number format for this set
    pub float_format: Option<NumberFormat>,
    /// Whether unused parameters should fail the render
    pub deny_unused: Option<bool>,
    pub parameters: ParameterSet,
}

/// TOML structure for deserializing parameter files
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlParams {
    metadata: Option<TomlMetadata>,
    format: Option<TomlFormat>,
    #[serde(default)]
    parameters: toml::Table,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlFormat {
    float: Option<String>,
    deny_unused: Option<bool>,
}

impl ParamsFile {
    /// Load a parameter file from disk
    pub fn from_file(path: &Path) -> Result<Self, ParamsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a parameter file from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ParamsError> {
        let parsed: TomlParams = toml::from_str(content)?;

        let mut parameters = ParameterSet::new();
        for (key, value) in parsed.parameters {
            let value = ParameterValue::from_toml(&key, value)?;
            parameters.insert(key, value);
        }

        let (float_format, deny_unused) = match parsed.format {
            Some(f) => (
                f.float.as_deref().map(str::parse::<NumberFormat>).transpose()?,
                f.deny_unused,
            ),
            None => (None, None),
        };

        Ok(ParamsFile {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            float_format,
            deny_unused,
            parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_types() {
        assert_eq!(ParameterValue::infer("8"), ParameterValue::Integer(8));
        assert_eq!(ParameterValue::infer("157.08"), ParameterValue::Float(157.08));
        assert_eq!(ParameterValue::infer("1e-3"), ParameterValue::Float(0.001));
        assert_eq!(
            ParameterValue::infer("PI"),
            ParameterValue::Text("PI".to_string())
        );
        // Not finite, keep as text
        assert_eq!(
            ParameterValue::infer("inf"),
            ParameterValue::Text("inf".to_string())
        );
    }

    #[test]
    fn test_assignments() {
        let mut set = ParameterSet::new();
        set.assign("motor_poles=8").unwrap();
        set.assign("path=results/a=b.csv").unwrap();
        set.assign_text("motor_id=0042").unwrap();
        assert_eq!(set.get("motor_poles"), Some(&ParameterValue::Integer(8)));
        assert_eq!(
            set.get("path"),
            Some(&ParameterValue::Text("results/a=b.csv".to_string()))
        );
        assert_eq!(
            set.get("motor_id"),
            Some(&ParameterValue::Text("0042".to_string()))
        );
    }

    #[test]
    fn test_invalid_assignment() {
        let mut set = ParameterSet::new();
        assert!(matches!(
            set.assign("no_equals_sign"),
            Err(ParamsError::InvalidAssignment(_))
        ));
        assert!(matches!(
            set.assign("9lives=1"),
            Err(ParamsError::InvalidAssignment(_))
        ));
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = ParameterSet::new().with("a", 1).with("b", "x");
        base.merge(ParameterSet::new().with("b", "y").with("c", 2.5));
        assert_eq!(base.keys(), vec!["a", "b", "c"]);
        assert_eq!(base.get("b"), Some(&ParameterValue::Text("y".to_string())));
    }

    #[test]
    fn test_parse_params_file() {
        let toml_str = r#"
[metadata]
name = "ILM50x14 nominal"

[format]
float = ".6"

[parameters]
motor_poles = 8
target_speed_rad_per_s = 157.08
controller_type = "PI"
"#;
        let file = ParamsFile::from_str(toml_str).expect("Should parse");
        assert_eq!(file.name.as_deref(), Some("ILM50x14 nominal"));
        assert_eq!(file.description, None);
        assert_eq!(file.float_format, Some(NumberFormat::Fixed(6)));
        assert_eq!(file.deny_unused, None);
        assert_eq!(file.parameters.len(), 3);
        assert_eq!(
            file.parameters.get("target_speed_rad_per_s"),
            Some(&ParameterValue::Float(157.08))
        );
    }

    #[test]
    fn test_params_file_without_sections() {
        let file = ParamsFile::from_str("").expect("Should parse");
        assert!(file.parameters.is_empty());
        assert_eq!(file.float_format, None);
    }

    #[test]
    fn test_unsupported_value_type() {
        let err = ParamsFile::from_str("[parameters]\nenabled = true\n").unwrap_err();
        assert!(matches!(
            err,
            ParamsError::UnsupportedValue { ref key, kind: "boolean" } if key == "enabled"
        ));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        for content in ["[parameters]\nx = nan\n", "[parameters]\ny = -inf\n"] {
            let err = ParamsFile::from_str(content).unwrap_err();
            assert!(matches!(
                err,
                ParamsError::UnsupportedValue { kind: "non-finite float", .. }
            ));
        }
    }

    #[test]
    fn test_misspelled_table_rejected() {
        let err = ParamsFile::from_str("[parameter]\nmotor_poles = 8\n").unwrap_err();
        assert!(matches!(err, ParamsError::ParseError(_)));
        let err = ParamsFile::from_str("[format]\nfloats = \".2\"\n").unwrap_err();
        assert!(matches!(err, ParamsError::ParseError(_)));
    }

    #[test]
    fn test_bad_float_format() {
        let err = ParamsFile::from_str("[format]\nfloat = \"wide\"\n").unwrap_err();
        assert!(matches!(err, ParamsError::InvalidFormat(_)));
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(ParamsFile::from_str("this is not valid toml {{{{").is_err());
    }
}
