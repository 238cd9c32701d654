//! Collaborator traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! (chat-db, chat-cache) provides the implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Message, NewMessage, NewRoom, Room, RoomMember};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message, assigning its identity and creation timestamp
    async fn create(&self, message: NewMessage) -> RepoResult<Message>;

    /// List messages in a room, oldest first.
    ///
    /// `limit` and `offset` are applied to the newest-first ordering, so
    /// `offset = 0` returns the most recent page. Bounds are the caller's job.
    async fn find_by_room(&self, room_id: Uuid, limit: i64, offset: i64) -> RepoResult<Vec<Message>>;
}

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Create a room together with its membership rows
    async fn create(&self, room: NewRoom, member_ids: &[String]) -> RepoResult<Room>;

    /// Find room by ID (members included)
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Room>>;

    /// List rooms a user belongs to, most recently updated first
    async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Room>>;

    /// List members of a room
    async fn members(&self, room_id: Uuid) -> RepoResult<Vec<RoomMember>>;

    /// Bump the room's `updated_at` (called when a message is posted)
    async fn touch(&self, room_id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Presence Repository
// ============================================================================

/// Ephemeral online/typing state.
///
/// Every operation is an independent idempotent point write or read, so
/// callers never need read-modify-write coordination.
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Mark a user online (refreshes an existing marker)
    async fn set_online(&self, user_id: &str) -> RepoResult<()>;

    /// Clear a user's online marker
    async fn set_offline(&self, user_id: &str) -> RepoResult<()>;

    /// Check whether a user has an online marker
    async fn is_online(&self, user_id: &str) -> RepoResult<bool>;

    /// Add a typing marker for (room, user)
    async fn add_typing(&self, room_id: &str, user_id: &str) -> RepoResult<()>;

    /// Remove a typing marker for (room, user)
    async fn remove_typing(&self, room_id: &str, user_id: &str) -> RepoResult<()>;

    /// List users currently typing in a room
    async fn list_typing(&self, room_id: &str) -> RepoResult<Vec<String>>;
}
