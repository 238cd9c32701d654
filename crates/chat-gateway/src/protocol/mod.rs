//! Gateway protocol definitions
//!
//! JSON text frames in both directions, tagged by `type` with the body under
//! `payload`.

mod commands;
mod events;

pub use commands::{room_key, ClientCommand, RoomRef, SendMessagePayload, TypingPayload};
pub use events::{NewMessageEvent, ServerEvent, UserTypingEvent};
