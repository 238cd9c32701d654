//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use chat_core::{Message, MessageRepository, NewMessage, RepoResult};

use crate::models::MessageModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(room_id = %message.room_id))]
    async fn create(&self, message: NewMessage) -> RepoResult<Message> {
        let message = Message::from_new(message, Uuid::new_v4(), Utc::now());

        sqlx::query(
            r"
            INSERT INTO messages (id, room_id, sender_id, content, kind, metadata, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(message.id)
        .bind(message.room_id)
        .bind(&message.sender_id)
        .bind(&message.content)
        .bind(message.kind.as_str())
        .bind(&message.metadata)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(message)
    }

    #[instrument(skip(self))]
    async fn find_by_room(&self, room_id: Uuid, limit: i64, offset: i64) -> RepoResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, room_id, sender_id, content, kind, metadata, created_at, updated_at
            FROM messages
            WHERE room_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(room_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        // Newest page first from the query, returned oldest first
        rows.into_iter()
            .rev()
            .map(Message::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMessageRepository>();
    }
}
