//! # chat-core
//!
//! Domain layer containing entities, domain errors, and the traits the messaging
//! hub consumes from its collaborators (message store, room store, presence store).
//! This crate has zero dependencies on infrastructure (database, cache, web framework).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    MemberRole, Message, MessageKind, NewMessage, NewRoom, Room, RoomKind, RoomMember,
};
pub use error::DomainError;
pub use traits::{MessageRepository, PresenceRepository, RepoResult, RoomRepository};
