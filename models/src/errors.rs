// models/src/errors.rs

use std::io;
pub use thiserror::Error;

use crate::identifiers::PatientId;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("invalid risk score {0}: score must be a finite number")]
    InvalidScore(f64),
    #[error("patient {0} was not found")]
    NotFound(PatientId),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for GuardError {
    fn from(err: serde_json::Error) -> Self {
        GuardError::SerializationError(format!("JSON processing error: {}", err))
    }
}

impl From<rmp_serde::encode::Error> for GuardError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        GuardError::SerializationError(format!("MessagePack encode error: {}", err))
    }
}

impl From<rmp_serde::decode::Error> for GuardError {
    fn from(err: rmp_serde::decode::Error) -> Self {
        GuardError::DeserializationError(format!("MessagePack decode error: {}", err))
    }
}

/// A validation error.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// An identifier has an invalid length.
    #[error("identifier has invalid length")]
    InvalidIdentifierLength,
    /// A blood pressure reading was not of the form `systolic/diastolic`.
    #[error("invalid blood pressure reading '{0}'")]
    InvalidBloodPressure(String),
}

/// A type alias for a `Result` that returns a `GuardError` on failure.
pub type GuardResult<T> = Result<T, GuardError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;
