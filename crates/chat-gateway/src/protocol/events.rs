//! Outbound server events
//!
//! Serialized with the same `{"type", "payload"}` envelope as client commands.

use chat_core::{Message, MessageKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// An event pushed to room members
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    NewMessage(NewMessageEvent),
    UserTyping(UserTypingEvent),
}

impl ServerEvent {
    pub fn new_message(message: &Message) -> Self {
        Self::NewMessage(NewMessageEvent::from(message))
    }

    pub fn user_typing(room_id: impl Into<String>, user_id: impl Into<String>, is_typing: bool) -> Self {
        Self::UserTyping(UserTypingEvent {
            room_id: room_id.into(),
            user_id: user_id.into(),
            is_typing,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageEvent {
    pub id: Uuid,
    pub room_id: Uuid,
    pub sender_id: String,
    pub content: String,
    pub kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for NewMessageEvent {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            room_id: message.room_id,
            sender_id: message.sender_id.clone(),
            content: message.content.clone(),
            kind: message.kind,
            metadata: message.metadata.clone(),
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypingEvent {
    pub room_id: String,
    pub user_id: String,
    pub is_typing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::NewMessage;

    #[test]
    fn test_new_message_wire_format() {
        let message = Message::from_new(
            NewMessage::text(Uuid::new_v4(), "alice", "hi"),
            Uuid::new_v4(),
            Utc::now(),
        );
        let json = serde_json::to_value(ServerEvent::new_message(&message)).unwrap();

        assert_eq!(json["type"], "new_message");
        assert_eq!(json["payload"]["content"], "hi");
        assert_eq!(json["payload"]["senderId"], "alice");
        assert_eq!(json["payload"]["roomId"], message.room_id.to_string());
        assert_eq!(json["payload"]["kind"], "text");
        assert!(json["payload"].get("metadata").is_none());
    }

    #[test]
    fn test_user_typing_wire_format() {
        let json = serde_json::to_value(ServerEvent::user_typing("r1", "bob", true)).unwrap();

        assert_eq!(json["type"], "user_typing");
        assert_eq!(json["payload"]["roomId"], "r1");
        assert_eq!(json["payload"]["userId"], "bob");
        assert_eq!(json["payload"]["isTyping"], true);
    }
}
