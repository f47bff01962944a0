//! Subscriber installation and error reporting.

use std::fmt::Display;

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::error::{HostError, Result};

/// Environment variable that overrides the configured log level.
pub const LOG_ENV_VAR: &str = "ISLANDHOP_LOG";

/// Output format for the global subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, one line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Build the filter: `ISLANDHOP_LOG` if set and valid, else `level`.
///
/// # Errors
/// Returns an error if neither the environment nor `level` is a valid filter.
pub fn filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| HostError::Logging(format!("invalid log level {level:?}: {e}")))
}

/// Install the global subscriber.
///
/// # Errors
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init(level: &str, format: LogFormat) -> Result<()> {
    let filter = filter(level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| HostError::Logging(e.to_string()))
}

/// Report a failure in a host callback without propagating it.
pub fn log_error(action: &str, err: &dyn Display) {
    error!(action, error = %err, "islandhop crashed while {action}");
}
