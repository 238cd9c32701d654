//! Presence storage module.
//!
//! Tracks user online markers and per-room typing markers.

mod memory;
mod redis_store;

pub use memory::InMemoryPresenceStore;
pub use redis_store::{PresenceStore, TYPING_TTL};
