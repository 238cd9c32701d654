//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chat_core::{Message, Room, RoomMember};

use super::responses::{MessageResponse, RoomMemberResponse, RoomResponse};

// ============================================================================
// Message Mappers
// ============================================================================

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            room_id: message.room_id,
            sender_id: message.sender_id.clone(),
            content: message.content.clone(),
            kind: message.kind,
            metadata: message.metadata.clone(),
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}

// ============================================================================
// Room Mappers
// ============================================================================

impl From<&RoomMember> for RoomMemberResponse {
    fn from(member: &RoomMember) -> Self {
        Self {
            user_id: member.user_id.clone(),
            role: member.role,
            joined_at: member.joined_at,
        }
    }
}

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            name: room.name.clone(),
            kind: room.kind,
            avatar_url: room.avatar_url.clone(),
            created_by: room.created_by.clone(),
            created_at: room.created_at,
            updated_at: room.updated_at,
            members: room.members.iter().map(RoomMemberResponse::from).collect(),
        }
    }
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self::from(&room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::{MemberRole, NewMessage, RoomKind};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_message_response_json() {
        let message = Message::from_new(
            NewMessage::text(Uuid::new_v4(), "alice", "hi"),
            Uuid::new_v4(),
            Utc::now(),
        );
        let json = serde_json::to_value(MessageResponse::from(&message)).unwrap();

        assert_eq!(json["senderId"], "alice");
        assert_eq!(json["roomId"], message.room_id.to_string());
        assert_eq!(json["kind"], "text");
        assert!(json.get("metadata").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_room_response_json() {
        let room_id = Uuid::new_v4();
        let now = Utc::now();
        let room = Room {
            id: room_id,
            name: "general".to_string(),
            kind: RoomKind::Group,
            avatar_url: None,
            created_by: "alice".to_string(),
            created_at: now,
            updated_at: now,
            members: vec![RoomMember {
                room_id,
                user_id: "alice".to_string(),
                role: MemberRole::Admin,
                joined_at: now,
            }],
        };
        let json = serde_json::to_value(RoomResponse::from(&room)).unwrap();

        assert_eq!(json["kind"], "group");
        assert_eq!(json["createdBy"], "alice");
        assert_eq!(json["members"][0]["role"], "admin");
        assert_eq!(json["members"][0]["userId"], "alice");
    }
}
