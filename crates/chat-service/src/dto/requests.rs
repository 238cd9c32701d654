//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Field names are camelCase on the wire; the older `conversationId`/`type`
//! spellings are accepted as aliases.

use chat_core::{MessageKind, RoomKind};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Maximum message length in characters, as enforced on `SendMessageRequest::content`
pub const MAX_CONTENT_LENGTH: u64 = 4000;

// ============================================================================
// Room Requests
// ============================================================================

/// Create room request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 255, message = "Room name must be 1-255 characters"))]
    pub name: String,

    #[serde(alias = "type")]
    pub kind: RoomKind,

    /// Other members; the creator is added if absent
    pub member_ids: Vec<String>,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Send message request (REST body, and the normalized form of a socket command)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(alias = "conversationId")]
    pub room_id: Uuid,

    #[validate(length(max = 4000, message = "Message content must be at most 4000 characters"))]
    pub content: String,

    #[serde(default, alias = "type")]
    pub kind: MessageKind,

    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}
