//! In-memory repository implementations
//!
//! Used when no `DATABASE_URL` is configured and by tests. Ordering matches
//! the PostgreSQL queries.

mod message;
mod room;

pub use message::InMemoryMessageRepository;
pub use room::InMemoryRoomRepository;
