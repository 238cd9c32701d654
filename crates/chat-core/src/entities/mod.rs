//! Domain entities - core business objects

mod message;
mod room;

pub use message::{Message, MessageKind, NewMessage};
pub use room::{MemberRole, NewRoom, Room, RoomKind, RoomMember};
