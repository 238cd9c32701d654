//! Database models
//!
//! Row structs with SQLx `FromRow` derives. Conversion into domain entities
//! lives in [`crate::mappers`].

mod message;
mod room;

pub use message::MessageModel;
pub use room::{RoomMemberModel, RoomModel};
