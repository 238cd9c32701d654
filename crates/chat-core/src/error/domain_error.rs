//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Room not found: {0}")]
    RoomNotFound(Uuid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Message content is empty")]
    EmptyContent,

    #[error("Direct room must have exactly 2 members (you + 1 other person), got {count}")]
    DirectRoomMemberCount { count: usize },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::RoomNotFound(_) => "UNKNOWN_ROOM",

            // Validation
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::DirectRoomMemberCount { .. } => "INVALID_DIRECT_ROOM",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RoomNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyContent | Self::DirectRoomMemberCount { .. })
    }

    /// Check if this error came from a backing store rather than the caller
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::CacheError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::RoomNotFound(Uuid::nil());
        assert_eq!(err.code(), "UNKNOWN_ROOM");

        let err = DomainError::DirectRoomMemberCount { count: 3 };
        assert_eq!(err.code(), "INVALID_DIRECT_ROOM");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::RoomNotFound(Uuid::nil()).is_not_found());
        assert!(!DomainError::EmptyContent.is_not_found());
    }

    #[test]
    fn test_is_validation() {
        assert!(DomainError::EmptyContent.is_validation());
        assert!(DomainError::DirectRoomMemberCount { count: 3 }.is_validation());
        assert!(!DomainError::DatabaseError("x".to_string()).is_validation());
    }

    #[test]
    fn test_is_infrastructure() {
        assert!(DomainError::DatabaseError("down".to_string()).is_infrastructure());
        assert!(DomainError::CacheError("down".to_string()).is_infrastructure());
        assert!(!DomainError::EmptyContent.is_infrastructure());
    }

    #[test]
    fn test_display() {
        let err = DomainError::DirectRoomMemberCount { count: 3 };
        assert!(err.to_string().contains("exactly 2 members"));
    }
}
