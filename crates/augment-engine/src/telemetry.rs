//! Formatting subscribers for engine diagnostics.
//!
//! The engine emits `tracing` events under [`ENGINE_TARGET`] and never
//! installs a subscriber itself. [`engine_subscriber`] builds one from
//! [`EngineSettings`] over any writer. A host without logging of its own
//! installs the result globally; a harness scopes it with
//! [`tracing::subscriber::with_default`] to observe dispatch.
//!
//! [`ENGINE_TARGET`]: crate::ENGINE_TARGET

use augment_config::{EngineSettings, LogFormat};
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter};

/// Boxed subscriber returned by [`engine_subscriber`].
pub type EngineSubscriber = Box<dyn Subscriber + Send + Sync + 'static>;

/// Errors raised while building a subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression did not parse.
    #[error("log filter '{filter}' is malformed: {message}")]
    Filter {
        /// Expression taken from the settings.
        filter: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Parses the filter expression from `settings`.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the expression is malformed.
pub fn filter_from(settings: &EngineSettings) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(settings.log_filter()).map_err(|error| TelemetryError::Filter {
        filter: settings.log_filter().to_owned(),
        message: error.to_string(),
    })
}

/// Builds a subscriber that formats events accepted by the settings' filter
/// and writes them through `writer`.
///
/// JSON output carries one flattened object per line; compact output one
/// plain line per event. Neither uses ANSI colour.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the filter expression is
/// malformed.
///
/// # Example
///
/// ```
/// use augment_config::{EngineSettings, LogFormat};
/// use augment_engine::{AugmentationEngine, telemetry::engine_subscriber};
///
/// let settings = EngineSettings::default()
///     .with_log_filter("augment_engine=debug")
///     .with_log_format(LogFormat::Compact);
/// let subscriber = engine_subscriber(&settings, std::io::sink).expect("valid filter");
/// tracing::subscriber::with_default(subscriber, || {
///     let _ = AugmentationEngine::none();
/// });
/// ```
pub fn engine_subscriber<W>(
    settings: &EngineSettings,
    writer: W,
) -> Result<EngineSubscriber, TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter_from(settings)?)
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false);

    Ok(match settings.log_format() {
        LogFormat::Json => Box::new(
            builder
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .finish(),
        ),
        LogFormat::Compact => Box::new(builder.compact().without_time().finish()),
    })
}
