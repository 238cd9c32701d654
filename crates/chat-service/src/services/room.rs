//! Room service
//!
//! Room creation rules and membership queries.

use chat_core::{DomainError, NewRoom, Room, RoomKind};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::dto::CreateRoomRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Room service
pub struct RoomService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a room owned by `creator_id`
    ///
    /// The creator is always a member and becomes its admin, so a group room
    /// may be created with no other members. A direct room must end up with
    /// exactly two distinct members.
    #[instrument(skip(self, request))]
    pub async fn create(&self, creator_id: &str, request: CreateRoomRequest) -> ServiceResult<Room> {
        request.validate()?;

        let members = member_list(creator_id, request.member_ids);
        if request.kind == RoomKind::Direct && members.len() != 2 {
            return Err(DomainError::DirectRoomMemberCount {
                count: members.len(),
            }
            .into());
        }

        let room = self
            .ctx
            .room_repo()
            .create(
                NewRoom {
                    name: request.name,
                    kind: request.kind,
                    created_by: creator_id.to_string(),
                },
                &members,
            )
            .await?;

        info!(room_id = %room.id, kind = %room.kind, members = members.len(), "Room created");

        Ok(room)
    }

    /// Get a room with its members
    #[instrument(skip(self))]
    pub async fn get(&self, room_id: Uuid) -> ServiceResult<Room> {
        self.ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Room", room_id.to_string()))
    }

    /// Rooms the user belongs to, most recently active first
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &str) -> ServiceResult<Vec<Room>> {
        Ok(self.ctx.room_repo().find_by_user(user_id).await?)
    }
}

/// Creator first, then the requested members in order, without duplicates
fn member_list(creator_id: &str, requested: Vec<String>) -> Vec<String> {
    let mut members = vec![creator_id.to_string()];
    for id in requested {
        let id = id.trim().to_string();
        if !id.is_empty() && !members.contains(&id) {
            members.push(id);
        }
    }
    members
}
