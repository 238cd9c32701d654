//! Business logic services
//!
//! Services borrow a [`ServiceContext`] and apply the rules that sit between
//! transport input and the repositories.

pub mod context;
pub mod error;
pub mod message;
pub mod presence;
pub mod room;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use message::MessageService;
pub use presence::PresenceService;
pub use room::RoomService;
