//! # chat-db
//!
//! Database layer implementing the room and message repository traits.
//!
//! ## Overview
//!
//! This crate provides two implementations of each repository trait defined
//! in `chat-core`:
//!
//! - PostgreSQL via SQLx, with a schema bootstrap run at startup
//! - In-memory, used when no database is configured and in tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_db::{create_pool, ensure_schema, DatabaseConfig, PgMessageRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     ensure_schema(&pool).await?;
//!     let message_repo = PgMessageRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{InMemoryMessageRepository, InMemoryRoomRepository};
pub use pool::{create_pool, ensure_schema, DatabaseConfig, PgPool};
pub use repositories::{PgMessageRepository, PgRoomRepository};
