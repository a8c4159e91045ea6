//! Default values applied when settings omit a field.

use crate::logging::LogFormat;

/// Default log filter expression for hosts installing telemetry.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Engines built from settings require method metadata unless told otherwise.
pub const DEFAULT_REQUIRE_METHOD_METADATA: bool = true;

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    String::from(DEFAULT_LOG_FILTER)
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default metadata requirement.
#[must_use]
pub const fn default_require_method_metadata() -> bool {
    DEFAULT_REQUIRE_METHOD_METADATA
}
