//! PostgreSQL implementation of RoomRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use chat_core::{NewRoom, RepoResult, Room, RoomMember, RoomRepository};

use crate::mappers::room_from_parts;
use crate::models::{RoomMemberModel, RoomModel};

use super::error::map_db_error;

/// PostgreSQL implementation of RoomRepository
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    /// Create a new PgRoomRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn member_rows(&self, room_ids: &[Uuid]) -> RepoResult<Vec<RoomMemberModel>> {
        sqlx::query_as::<_, RoomMemberModel>(
            r"
            SELECT room_id, user_id, role, joined_at
            FROM room_members
            WHERE room_id = ANY($1)
            ORDER BY joined_at ASC, user_id ASC
            ",
        )
        .bind(room_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    #[instrument(skip(self, room), fields(kind = %room.kind))]
    async fn create(&self, room: NewRoom, member_ids: &[String]) -> RepoResult<Room> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        // Room row and membership rows land together or not at all
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let row = sqlx::query_as::<_, RoomModel>(
            r"
            INSERT INTO rooms (id, name, kind, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, name, kind, avatar_url, created_by, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&room.name)
        .bind(room.kind.as_str())
        .bind(&room.created_by)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let mut members = Vec::with_capacity(member_ids.len());
        for user_id in member_ids {
            let member = sqlx::query_as::<_, RoomMemberModel>(
                r"
                INSERT INTO room_members (room_id, user_id, role, joined_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (room_id, user_id) DO NOTHING
                RETURNING room_id, user_id, role, joined_at
                ",
            )
            .bind(id)
            .bind(user_id)
            .bind(room.role_for(user_id).as_str())
            .bind(now)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;
            members.extend(member);
        }

        tx.commit().await.map_err(map_db_error)?;

        room_from_parts(row, members)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Room>> {
        let row = sqlx::query_as::<_, RoomModel>(
            r"
            SELECT id, name, kind, avatar_url, created_by, created_at, updated_at
            FROM rooms
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match row {
            Some(row) => {
                let members = self.member_rows(&[row.id]).await?;
                room_from_parts(row, members).map(Some)
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Room>> {
        let rows = sqlx::query_as::<_, RoomModel>(
            r"
            SELECT r.id, r.name, r.kind, r.avatar_url, r.created_by, r.created_at, r.updated_at
            FROM rooms r
            INNER JOIN room_members m ON m.room_id = r.id
            WHERE m.user_id = $1
            ORDER BY r.updated_at DESC, r.id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut by_room: HashMap<Uuid, Vec<RoomMemberModel>> = HashMap::new();
        for member in self.member_rows(&ids).await? {
            by_room.entry(member.room_id).or_default().push(member);
        }

        rows.into_iter()
            .map(|row| {
                let members = by_room.remove(&row.id).unwrap_or_default();
                room_from_parts(row, members)
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn members(&self, room_id: Uuid) -> RepoResult<Vec<RoomMember>> {
        self.member_rows(&[room_id])
            .await?
            .into_iter()
            .map(RoomMember::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn touch(&self, room_id: Uuid) -> RepoResult<()> {
        sqlx::query("UPDATE rooms SET updated_at = NOW() WHERE id = $1")
            .bind(room_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
