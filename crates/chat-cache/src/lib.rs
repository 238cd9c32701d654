//! # chat-cache
//!
//! Presence storage: online markers per user and typing markers per room.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Presence**: `PresenceRepository` backed by Redis, or by process memory
//!   when no Redis is configured
//!
//! ## Example
//!
//! ```ignore
//! use chat_cache::{PresenceStore, RedisPool, RedisPoolConfig};
//! use chat_core::PresenceRepository;
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let presence = PresenceStore::new(pool);
//!
//! presence.set_online("alice").await?;
//! presence.add_typing("general", "alice").await?;
//! ```

pub mod pool;
pub mod presence;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export presence types
pub use presence::{InMemoryPresenceStore, PresenceStore, TYPING_TTL};
