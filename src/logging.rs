//! Structured logging setup.

use crate::config::LoggingSettings;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the log subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directives could not be parsed.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    /// A global subscriber is already installed.
    #[error("failed to install log subscriber: {0}")]
    Install(Box<dyn std::error::Error + Send + Sync>),
}

/// Builds the event filter described by `settings`.
///
/// # Errors
///
/// Returns [`LoggingError::Filter`] when the directives are malformed.
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter, LoggingError> {
    Ok(EnvFilter::try_new(&settings.filter)?)
}

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`LoggingError`] when the filter is malformed or a subscriber is
/// already installed.
pub fn init(settings: &LoggingSettings) -> Result<(), LoggingError> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(settings)?);
    let installed = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(LoggingError::Install)
}
