//! simplate - placeholder templates for motor eccentricity studies
//!
//! This library stores the system model, simulator script and report
//! templates of the study and renders them against a parameter set.
//!
//! # Example
//!
//! ```rust
//! use simplate::{render, ParameterSet};
//!
//! let params = ParameterSet::new()
//!     .with("motor_poles", 8)
//!     .with("target_speed_rad_per_s", 157.08);
//!
//! let text = render("poles={motor_poles}, speed={target_speed_rad_per_s}", &params).unwrap();
//! assert_eq!(text, "poles=8, speed=157.08");
//! ```

pub mod error;
pub mod format;
pub mod lint;
pub mod params;
pub mod parser;
pub mod renderer;
pub mod template;

pub use error::TemplateError;
pub use format::NumberFormat;
pub use lint::{LintCategory, LintWarning};
pub use params::{ParameterSet, ParameterValue, ParamsError, ParamsFile};
pub use parser::{migrate, parse, MarkerSyntax, Template};
pub use renderer::{render_template, RenderConfig, RenderedArtifact};
pub use template::{TemplateDefinition, TemplateRegistry};

/// Render brace-syntax source with the default configuration
///
/// # Example
///
/// ```rust
/// use simplate::{render, ParameterSet, TemplateError};
///
/// let params = ParameterSet::new().with("a", 1);
/// let err = render("{a} {b}", &params).unwrap_err();
/// assert!(matches!(err, TemplateError::MissingParameter { ref key, .. } if key == "b"));
/// ```
pub fn render(source: &str, params: &ParameterSet) -> Result<String, TemplateError> {
    render_with_config(source, params, &RenderConfig::default()).map(|artifact| artifact.text)
}

/// Render brace-syntax source with custom configuration
///
/// # Example
///
/// ```rust
/// use simplate::{render_with_config, NumberFormat, ParameterSet, RenderConfig};
///
/// let config = RenderConfig::new().with_float_format(NumberFormat::Fixed(3));
/// let params = ParameterSet::new().with("hil_ts", 0.0001);
///
/// let out = render_with_config("Ts={hil_ts}", &params, &config).unwrap();
/// assert_eq!(out.text, "Ts=0.000");
/// ```
pub fn render_with_config(
    source: &str,
    params: &ParameterSet,
    config: &RenderConfig,
) -> Result<RenderedArtifact, TemplateError> {
    let template = parse("<inline>", source, MarkerSyntax::Brace)?;
    render_template(&template, params, config)
}
