//! Configuration for template rendering

use crate::format::NumberFormat;
use crate::params::ParamsFile;

/// Configuration options for substitution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderConfig {
    /// Format for numeric values whose marker has no spec of its own
    pub float_format: NumberFormat,

    /// Fail with `UnusedParameters` instead of reporting a warning
    pub deny_unused: bool,
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default number format
    pub fn with_float_format(mut self, format: NumberFormat) -> Self {
        self.float_format = format;
        self
    }

    /// Set whether unused parameters are an error
    pub fn with_deny_unused(mut self, deny: bool) -> Self {
        self.deny_unused = deny;
        self
    }

    /// Take the defaults a parameter file declares, keeping ours where it is silent
    pub fn with_params_file(mut self, file: &ParamsFile) -> Self {
        if let Some(format) = file.float_format {
            self.float_format = format;
        }
        if let Some(deny) = file.deny_unused {
            self.deny_unused = deny;
        }
        self
    }
}
