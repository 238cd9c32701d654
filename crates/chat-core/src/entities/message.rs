//! Message entity - represents a chat message persisted in a room

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of message content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    File,
    Video,
}

impl MessageKind {
    /// Wire/database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "file" => Ok(Self::File),
            "video" => Ok(Self::Video),
            _ => Err(format!("Invalid message kind: {s}")),
        }
    }
}

/// Message entity
///
/// Identity and timestamps are assigned by the message store on persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub room_id: Uuid,
    pub sender_id: String,
    pub content: String,
    pub kind: MessageKind,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Materialize a persisted message from a pending one
    pub fn from_new(new: NewMessage, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            room_id: new.room_id,
            sender_id: new.sender_id,
            content: new.content,
            kind: new.kind,
            metadata: new.metadata,
            created_at,
            updated_at: created_at,
        }
    }
}

/// A message that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub room_id: Uuid,
    pub sender_id: String,
    pub content: String,
    pub kind: MessageKind,
    pub metadata: Option<serde_json::Value>,
}

impl NewMessage {
    /// Create a plain text message
    pub fn text(room_id: Uuid, sender_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            room_id,
            sender_id: sender_id.into(),
            content: content.into(),
            kind: MessageKind::Text,
            metadata: None,
        }
    }

    /// Check if message content is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kind_parse() {
        assert_eq!("text".parse::<MessageKind>().unwrap(), MessageKind::Text);
        assert_eq!("VIDEO".parse::<MessageKind>().unwrap(), MessageKind::Video);
        assert!("sticker".parse::<MessageKind>().is_err());
        assert_eq!(MessageKind::default(), MessageKind::Text);
    }

    #[test]
    fn test_message_kind_serde() {
        let json = serde_json::to_string(&MessageKind::Image).unwrap();
        assert_eq!(json, "\"image\"");
    }

    #[test]
    fn test_from_new_assigns_identity() {
        let room_id = Uuid::new_v4();
        let id = Uuid::new_v4();
        let now = Utc::now();
        let message = Message::from_new(NewMessage::text(room_id, "alice", "hi"), id, now);

        assert_eq!(message.id, id);
        assert_eq!(message.room_id, room_id);
        assert_eq!(message.sender_id, "alice");
        assert_eq!(message.created_at, now);
        assert_eq!(message.updated_at, now);
    }

    #[test]
    fn test_is_empty() {
        let room_id = Uuid::new_v4();
        assert!(NewMessage::text(room_id, "a", "   ").is_empty());
        assert!(!NewMessage::text(room_id, "a", "hi").is_empty());
    }
}
