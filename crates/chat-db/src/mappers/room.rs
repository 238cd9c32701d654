//! Room and membership model -> entity mappers

use chat_core::{DomainError, Room, RoomMember};

use crate::models::{RoomMemberModel, RoomModel};

impl TryFrom<RoomMemberModel> for RoomMember {
    type Error = DomainError;

    fn try_from(model: RoomMemberModel) -> Result<Self, Self::Error> {
        Ok(RoomMember {
            room_id: model.room_id,
            user_id: model.user_id,
            role: model.role.parse().map_err(DomainError::DatabaseError)?,
            joined_at: model.joined_at,
        })
    }
}

/// Assemble a room entity from its row and membership rows
pub fn room_from_parts(
    model: RoomModel,
    members: Vec<RoomMemberModel>,
) -> Result<Room, DomainError> {
    Ok(Room {
        id: model.id,
        name: model.name,
        kind: model.kind.parse().map_err(DomainError::DatabaseError)?,
        avatar_url: model.avatar_url,
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
        members: members
            .into_iter()
            .map(RoomMember::try_from)
            .collect::<Result<_, _>>()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::{MemberRole, RoomKind};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_room_from_parts() {
        let room_id = Uuid::new_v4();
        let now = Utc::now();
        let room = room_from_parts(
            RoomModel {
                id: room_id,
                name: "general".to_string(),
                kind: "group".to_string(),
                avatar_url: None,
                created_by: "alice".to_string(),
                created_at: now,
                updated_at: now,
            },
            vec![RoomMemberModel {
                room_id,
                user_id: "alice".to_string(),
                role: "admin".to_string(),
                joined_at: now,
            }],
        )
        .unwrap();

        assert_eq!(room.kind, RoomKind::Group);
        assert_eq!(room.members.len(), 1);
        assert_eq!(room.members[0].role, MemberRole::Admin);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = RoomMember::try_from(RoomMemberModel {
            room_id: Uuid::new_v4(),
            user_id: "bob".to_string(),
            role: "owner".to_string(),
            joined_at: Utc::now(),
        })
        .unwrap_err();
        assert!(err.is_infrastructure());
    }
}
