//! Template registry for stored and file-based templates

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::TemplateError;
use crate::parser::ast::{MarkerSyntax, Template};
use crate::parser::parse;

/// Errors that can occur during registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Template not found in registry
    #[error("template not found: {name} (available: {available})")]
    NotFound { name: String, available: String },

    /// Duplicate template definition
    #[error("duplicate template definition: {name}")]
    Duplicate { name: String },

    /// Error reading template file
    #[error("error reading template file {path}: {message}")]
    FileReadError { path: PathBuf, message: String },
}

/// A builtin template: `(name, file name, syntax, description, source)`
type Builtin = (&'static str, &'static str, MarkerSyntax, &'static str, &'static str);

const BUILTINS: &[Builtin] = &[
    (
        "bldc_system",
        "BLDC_System.mo",
        MarkerSyntax::Brace,
        "System model: torque-map motor, shaft/load, encoder, sample-and-hold, inverter loop",
        include_str!("../../templates/bldc_system.mo"),
    ),
    (
        "bldc_system_legacy",
        "BLDC_System.mo",
        MarkerSyntax::Legacy,
        "Earlier system model with <replace>/%controller% markers",
        include_str!("../../templates/bldc_system_legacy.mo"),
    ),
    (
        "simulate_script",
        "run_sim.mos",
        MarkerSyntax::Brace,
        "Simulator script: load library, package and model, simulate to CSV",
        include_str!("../../templates/simulate.mos"),
    ),
    (
        "package_stub",
        "package.mo",
        MarkerSyntax::Brace,
        "Package declaration for the EccentricityStudy models",
        include_str!("../../templates/package.mo"),
    ),
    (
        "eccentricity_report",
        "report.md",
        MarkerSyntax::Brace,
        "Per-motor Markdown report: parameters, ripple, system response, Campbell diagram",
        include_str!("../../templates/eccentricity_report.md"),
    ),
];

/// A stored template definition
#[derive(Debug, Clone)]
pub struct TemplateDefinition {
    /// Registry name
    pub name: String,
    /// Marker syntax the source is written in
    pub syntax: MarkerSyntax,
    /// File name the rendered artifact is conventionally written as
    pub output_name: Option<String>,
    pub description: Option<String>,
    /// Path to source file (for file-based templates)
    pub source_path: Option<PathBuf>,
    pub source: String,
}

impl TemplateDefinition {
    pub fn new(name: impl Into<String>, source: impl Into<String>, syntax: MarkerSyntax) -> Self {
        Self {
            name: name.into(),
            syntax,
            output_name: None,
            description: None,
            source_path: None,
            source: source.into(),
        }
    }

    fn builtin(&(name, output, syntax, description, source): &Builtin) -> Self {
        Self {
            name: name.to_string(),
            syntax,
            output_name: Some(output.to_string()),
            description: Some(description.to_string()),
            source_path: None,
            source: source.to_string(),
        }
    }

    /// Parse the source with the declared syntax
    pub fn parse(&self) -> Result<Template, TemplateError> {
        parse(self.name.clone(), self.source.clone(), self.syntax)
    }

    /// Check if this is a file-based template
    pub fn is_file_based(&self) -> bool {
        self.source_path.is_some()
    }
}

/// Registry for storing template definitions
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, TemplateDefinition>,
    /// Base path for resolving relative file paths
    base_path: Option<PathBuf>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the builtin catalog
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for builtin in BUILTINS {
            let def = TemplateDefinition::builtin(builtin);
            registry.templates.insert(def.name.clone(), def);
        }
        registry
    }

    /// Create a new registry with a base path for file resolution
    pub fn with_base_path(mut self, base_path: PathBuf) -> Self {
        self.base_path = Some(base_path);
        self
    }

    /// Register a template definition directly
    pub fn register(&mut self, def: TemplateDefinition) -> Result<(), RegistryError> {
        if self.templates.contains_key(&def.name) {
            return Err(RegistryError::Duplicate {
                name: def.name.clone(),
            });
        }
        self.templates.insert(def.name.clone(), def);
        Ok(())
    }

    /// Read a template file and register it under `name`
    pub fn load_file(
        &mut self,
        name: impl Into<String>,
        path: &Path,
        syntax: MarkerSyntax,
    ) -> Result<&TemplateDefinition, RegistryError> {
        let name = name.into();
        let full_path = self.resolve_path(path);
        let source =
            std::fs::read_to_string(&full_path).map_err(|e| RegistryError::FileReadError {
                path: full_path.clone(),
                message: e.to_string(),
            })?;

        let mut def = TemplateDefinition::new(name.clone(), source, syntax);
        def.output_name = full_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned());
        def.source_path = Some(full_path);
        self.register(def)?;
        self.get(&name)
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Result<&TemplateDefinition, RegistryError> {
        self.templates
            .get(name)
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Check if a template exists
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// All template names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// All definitions, sorted by name
    pub fn definitions(&self) -> Vec<&TemplateDefinition> {
        let mut defs: Vec<&TemplateDefinition> = self.templates.values().collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Get the base path for file resolution
    pub fn base_path(&self) -> Option<&PathBuf> {
        self.base_path.as_ref()
    }

    /// Resolve a relative path against the base path
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let registry = TemplateRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec![
                "bldc_system",
                "bldc_system_legacy",
                "eccentricity_report",
                "package_stub",
                "simulate_script"
            ]
        );
        let legacy = registry.get("bldc_system_legacy").unwrap();
        assert_eq!(legacy.syntax, MarkerSyntax::Legacy);
        assert!(!legacy.is_file_based());
    }

    #[test]
    fn test_not_found_lists_available() {
        let registry = TemplateRegistry::with_builtins();
        let err = registry.get("nope").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nope"));
        assert!(msg.contains("simulate_script"));
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = TemplateRegistry::new();
        registry
            .register(TemplateDefinition::new("a", "{x}", MarkerSyntax::Brace))
            .unwrap();
        let result = registry.register(TemplateDefinition::new("a", "{y}", MarkerSyntax::Brace));
        assert!(matches!(result, Err(RegistryError::Duplicate { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let mut registry = TemplateRegistry::new().with_base_path(PathBuf::from("/nonexistent"));
        let result = registry.load_file("m", Path::new("model.mo"), MarkerSyntax::Brace);
        match result {
            Err(RegistryError::FileReadError { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/model.mo"));
            }
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_definition_parse_uses_declared_syntax() {
        let def = TemplateDefinition::new("t", "%ctrl% {x", MarkerSyntax::Legacy);
        let template = def.parse().expect("legacy braces are text");
        assert_eq!(template.placeholders().len(), 1);
    }
}
