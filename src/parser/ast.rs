//! Syntax tree types for parsed templates

use crate::format::NumberFormat;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid placeholder name (alphanumeric + underscore, starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Placeholder convention a template is authored in.
///
/// Declared per template, never detected from the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerSyntax {
    /// `{name}` / `{name:spec}` with `{{` and `}}` escapes
    #[default]
    Brace,
    /// `%name%` and `<name>`, kept for migrating older templates
    Legacy,
}

impl MarkerSyntax {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerSyntax::Brace => "brace",
            MarkerSyntax::Legacy => "legacy",
        }
    }
}

impl std::fmt::Display for MarkerSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for MarkerSyntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brace" => Ok(MarkerSyntax::Brace),
            "legacy" => Ok(MarkerSyntax::Legacy),
            other => Err(format!(
                "unknown marker syntax '{}' (expected 'brace' or 'legacy')",
                other
            )),
        }
    }
}

/// A placeholder marker
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub name: Identifier,
    /// Per-marker number format, overriding the render default
    pub format: Option<NumberFormat>,
    /// Format spec as written after the colon
    pub raw_spec: Option<String>,
}

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text copied to the output as-is
    Literal(String),
    /// Marker replaced by a bound value
    Placeholder(Placeholder),
}

/// A parsed template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Name used in diagnostics (file name or builtin name)
    pub name: String,
    pub syntax: MarkerSyntax,
    pub source: String,
    pub segments: Vec<Spanned<Segment>>,
}

impl Template {
    /// Unique placeholder names in order of first appearance
    pub fn placeholders(&self) -> Vec<&Identifier> {
        let mut seen: Vec<&Identifier> = Vec::new();
        for placeholder in self.markers() {
            if !seen.contains(&&placeholder.node.name) {
                seen.push(&placeholder.node.name);
            }
        }
        seen
    }

    /// Every placeholder marker with its span, in source order
    pub fn markers(&self) -> impl Iterator<Item = Spanned<&Placeholder>> + '_ {
        self.segments.iter().filter_map(|seg| match &seg.node {
            Segment::Placeholder(p) => Some(Spanned::new(p, seg.span.clone())),
            Segment::Literal(_) => None,
        })
    }

    /// Check whether a placeholder name appears in this template
    pub fn references(&self, name: &str) -> bool {
        self.markers().any(|p| p.node.name.as_str() == name)
    }
}
