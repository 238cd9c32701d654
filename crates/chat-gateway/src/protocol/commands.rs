//! Inbound client commands
//!
//! Every client frame is a JSON text message of the form
//! `{"type": "<command>", "payload": {...}}`.

use chat_core::MessageKind;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

/// A command sent by the client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientCommand {
    #[serde(alias = "join_conversation")]
    JoinRoom(RoomRef),

    #[serde(alias = "leave_conversation")]
    LeaveRoom(RoomRef),

    SendMessage(SendMessagePayload),

    Typing(TypingPayload),
}

impl ClientCommand {
    /// Decode a text frame
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Wire name of the command, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom(_) => "join_room",
            Self::LeaveRoom(_) => "leave_room",
            Self::SendMessage(_) => "send_message",
            Self::Typing(_) => "typing",
        }
    }
}

/// Payload naming a single room
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRef {
    #[serde(alias = "conversationId")]
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    #[serde(alias = "conversationId")]
    pub room_id: String,
    pub content: String,
    #[serde(default, alias = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    #[serde(alias = "conversationId")]
    pub room_id: String,
    #[serde(default)]
    pub is_typing: bool,
}

/// Canonical registry key for a room id
///
/// Surrounding whitespace is dropped and UUIDs are written in lowercase
/// hyphenated form, so REST and socket traffic for the same room meet in
/// one member set. Returns `None` for an empty id.
pub fn room_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(
        Uuid::parse_str(trimmed)
            .map(|id| id.to_string())
            .unwrap_or_else(|_| trimmed.to_string()),
    )
}
