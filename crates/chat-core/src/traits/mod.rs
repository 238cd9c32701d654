//! Collaborator traits (ports)

mod repositories;

pub use repositories::{MessageRepository, PresenceRepository, RepoResult, RoomRepository};
