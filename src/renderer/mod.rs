//! Template renderer
//!
//! Substitutes every placeholder of a parsed [`Template`](crate::Template)
//! with the text form of its bound value. Rendering is a pure function of
//! the template, the parameters and the config.

pub mod config;
mod substitute;

pub use config::RenderConfig;
pub use substitute::{render_template, RenderedArtifact};
