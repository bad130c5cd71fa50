//! Stored templates
//!
//! The registry holds the builtin catalog embedded in the crate and any
//! template files a caller loads. Each definition declares its marker
//! syntax; nothing is guessed from the content.
//!
//! # Example
//!
//! ```rust
//! use simplate::template::TemplateRegistry;
//!
//! let registry = TemplateRegistry::with_builtins();
//! let model = registry.get("bldc_system").unwrap().parse().unwrap();
//! assert!(model.references("motor_poles"));
//! ```

mod registry;

pub use registry::{RegistryError, TemplateDefinition, TemplateRegistry};
