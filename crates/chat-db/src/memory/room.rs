//! In-memory RoomRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use chat_core::{NewRoom, RepoResult, Room, RoomMember, RoomRepository};

#[derive(Debug, Default)]
pub struct InMemoryRoomRepository {
    rooms: RwLock<HashMap<Uuid, Room>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create(&self, room: NewRoom, member_ids: &[String]) -> RepoResult<Room> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut members: Vec<RoomMember> = Vec::with_capacity(member_ids.len());
        for user_id in member_ids {
            if members.iter().any(|m| &m.user_id == user_id) {
                continue;
            }
            members.push(RoomMember {
                room_id: id,
                user_id: user_id.clone(),
                role: room.role_for(user_id),
                joined_at: now,
            });
        }

        let created = Room {
            id,
            name: room.name,
            kind: room.kind,
            avatar_url: None,
            created_by: room.created_by,
            created_at: now,
            updated_at: now,
            members,
        };
        self.rooms.write().insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Room>> {
        Ok(self.rooms.read().get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Room>> {
        let mut rooms: Vec<Room> = self
            .rooms
            .read()
            .values()
            .filter(|room| room.has_member(user_id))
            .cloned()
            .collect();
        rooms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(rooms)
    }

    async fn members(&self, room_id: Uuid) -> RepoResult<Vec<RoomMember>> {
        Ok(self
            .rooms
            .read()
            .get(&room_id)
            .map(|room| room.members.clone())
            .unwrap_or_default())
    }

    async fn touch(&self, room_id: Uuid) -> RepoResult<()> {
        if let Some(room) = self.rooms.write().get_mut(&room_id) {
            room.updated_at = Utc::now();
        }
        Ok(())
    }
}
