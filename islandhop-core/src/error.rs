//! Error types for the islandhop scheduler core.

use thiserror::Error;

/// Top-level error type for all scheduler operations.
#[derive(Error, Debug)]
pub enum SchedError {
    /// Configuration could not be parsed or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An entity name could not be resolved by the host simulation.
    #[error("Entity not resolvable: {0}")]
    EntityUnresolvable(crate::EntityId),

    /// A raw value did not match any known variant of an enum.
    ///
    /// Indicates a logic or version mismatch between the host and this crate,
    /// so it is never silently defaulted.
    #[error("Enum {enum_name} received unexpected value {value}")]
    UnexpectedEnumValue {
        /// Name of the enum type that received the value.
        enum_name: &'static str,
        /// The offending raw value, rendered as text.
        value: String,
    },

    /// An expected host location, entity or collaborator was absent.
    #[error("Host integration failure: {0}")]
    HostIntegration(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchedError {
    /// Build an [`SchedError::UnexpectedEnumValue`] for enum `T`.
    pub fn unexpected_enum<T>(value: impl std::fmt::Display) -> Self {
        let full = std::any::type_name::<T>();
        let enum_name = full.rsplit("::").next().unwrap_or(full);
        Self::UnexpectedEnumValue {
            enum_name,
            value: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for SchedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, SchedError>;
