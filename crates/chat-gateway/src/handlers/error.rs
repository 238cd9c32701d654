//! Handler error types
//!
//! Handler errors are logged by the dispatcher and never end the session.

use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Payload was well-formed JSON but not acceptable
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Service error (validation or persistence)
    #[error("Service error: {0}")]
    Service(#[from] chat_service::ServiceError),

    /// Outbound event could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HandlerError {
    /// Whether the client caused the failure
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidPayload(_) => true,
            Self::Service(e) => (400..500).contains(&e.status_code()),
            Self::Serialization(_) => false,
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
