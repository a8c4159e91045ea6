//! Shared settings for the query augmentation engine.
//!
//! The engine itself is configured in code, but hosts usually carry a settings
//! document alongside their repository configuration. This crate defines that
//! document: whether construction insists on method metadata, and how the
//! optional telemetry subscriber filters and formats events.

pub mod defaults;
pub mod logging;
pub mod settings;

pub use self::defaults::{DEFAULT_LOG_FILTER, DEFAULT_REQUIRE_METHOD_METADATA};
pub use self::logging::{LogFormat, LogFormatParseError};
pub use self::settings::EngineSettings;
