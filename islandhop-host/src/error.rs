//! Error type for the host integration layer.

use islandhop_core::SchedError;
use thiserror::Error;

/// Errors raised while wiring the scheduler into a host.
#[derive(Error, Debug)]
pub enum HostError {
    /// Error from the scheduler core.
    #[error(transparent)]
    Core(#[from] SchedError),

    /// The tracing subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// An asset could not be loaded, edited or invalidated.
    #[error("Asset {name} failed: {reason}")]
    Asset {
        /// Asset name as the host knows it.
        name: String,
        /// What went wrong.
        reason: String,
    },
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, HostError>;
