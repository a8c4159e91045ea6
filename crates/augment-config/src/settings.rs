//! Engine construction and diagnostics settings.
//!
//! [`EngineSettings`] is deserialised from whatever document format the host
//! uses for its own configuration. Every field has a default, so an empty
//! document yields the strict, production-safe configuration.

use serde::{Deserialize, Serialize};

use crate::defaults::{
    default_log_filter_string, default_log_format, default_require_method_metadata,
};
use crate::logging::LogFormat;

/// Settings consumed by the augmentation engine builder and its telemetry
/// helper.
///
/// # Example
///
/// ```ignore
/// let settings = EngineSettings::default();
/// assert!(settings.require_method_metadata());
/// assert_eq!(settings.log_filter(), "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSettings {
    #[serde(default = "default_require_method_metadata")]
    require_method_metadata: bool,
    #[serde(default = "default_log_filter_string")]
    log_filter: String,
    #[serde(default = "default_log_format")]
    log_format: LogFormat,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            require_method_metadata: default_require_method_metadata(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl EngineSettings {
    /// Relaxes or enforces the method-metadata requirement.
    #[must_use]
    pub const fn with_require_method_metadata(mut self, require: bool) -> Self {
        self.require_method_metadata = require;
        self
    }

    /// Overrides the log filter expression.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Overrides the log output format.
    #[must_use]
    pub const fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Whether engine construction rejects absent method metadata.
    #[must_use]
    pub const fn require_method_metadata(&self) -> bool {
        self.require_method_metadata
    }

    /// Filter expression handed to the tracing subscriber.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format for the tracing subscriber.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
