//! Service-level error taxonomy

use thiserror::Error;

use crate::data::{ScoreOutOfRange, WorldStateError};

/// Internal error kinds behind the public sentinel boundary.
///
/// These never cross the public API; the error boundary logs them with full
/// context and converts the operation result to `None`.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed scenario or agent configuration
    #[error("validation failed: {0}")]
    Validation(String),
    /// World state or payload that cannot be serialized
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Store unavailable, closed, or a statement rejected by the backend
    #[error("persistence failed: {0}")]
    Persistence(String),
    /// No database was attached at call time
    #[error("store unavailable")]
    Unavailable,
}

impl ServiceError {
    /// Stable tag for structured logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::Serialization(_) => "serialization",
            ServiceError::Persistence(_) => "persistence",
            ServiceError::Unavailable => "persistence",
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(e: rusqlite::Error) -> Self {
        ServiceError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Serialization(e.to_string())
    }
}

impl From<WorldStateError> for ServiceError {
    fn from(e: WorldStateError) -> Self {
        ServiceError::Serialization(e.to_string())
    }
}

impl From<ScoreOutOfRange> for ServiceError {
    fn from(e: ScoreOutOfRange) -> Self {
        ServiceError::Validation(e.to_string())
    }
}
