//! User presence storage in Redis.
//!
//! Online markers are plain string keys holding the time the user came online.
//! Typing markers are a set per room that expires after [`TYPING_TTL`] seconds
//! without a new typing start.

use async_trait::async_trait;
use chat_core::{PresenceRepository, RepoResult};
use redis::AsyncCommands;

use crate::pool::{RedisPool, RedisResult};

/// Key prefix for user online markers
const ONLINE_PREFIX: &str = "user:";
const ONLINE_SUFFIX: &str = ":online";
/// Key prefix for room typing sets
const TYPING_PREFIX: &str = "conversation:";
const TYPING_SUFFIX: &str = ":typing";

/// Typing indicator TTL (10 seconds)
pub const TYPING_TTL: u64 = 10;

/// Redis-backed presence store
#[derive(Clone, Debug)]
pub struct PresenceStore {
    pool: RedisPool,
}

impl PresenceStore {
    /// Create a new presence store
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Generate Redis key for a user's online marker
    fn online_key(user_id: &str) -> String {
        format!("{ONLINE_PREFIX}{user_id}{ONLINE_SUFFIX}")
    }

    /// Generate Redis key for a room's typing set
    fn typing_key(room_id: &str) -> String {
        format!("{TYPING_PREFIX}{room_id}{TYPING_SUFFIX}")
    }

    async fn mark_online(&self, user_id: &str) -> RedisResult<()> {
        let mut conn = self.pool.get().await?;
        conn.set::<_, _, ()>(Self::online_key(user_id), chrono::Utc::now().timestamp())
            .await?;
        Ok(())
    }

    async fn clear_online(&self, user_id: &str) -> RedisResult<()> {
        let mut conn = self.pool.get().await?;
        conn.del::<_, ()>(Self::online_key(user_id)).await?;
        Ok(())
    }

    async fn has_online(&self, user_id: &str) -> RedisResult<bool> {
        let mut conn = self.pool.get().await?;
        Ok(conn.exists(Self::online_key(user_id)).await?)
    }

    async fn start_typing(&self, room_id: &str, user_id: &str) -> RedisResult<()> {
        let key = Self::typing_key(room_id);
        let mut conn = self.pool.get().await?;
        redis::pipe()
            .atomic()
            .sadd(&key, user_id)
            .ignore()
            .expire(&key, TYPING_TTL as i64)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn stop_typing(&self, room_id: &str, user_id: &str) -> RedisResult<()> {
        let mut conn = self.pool.get().await?;
        conn.srem::<_, _, ()>(Self::typing_key(room_id), user_id)
            .await?;
        Ok(())
    }

    async fn typing_members(&self, room_id: &str) -> RedisResult<Vec<String>> {
        let mut conn = self.pool.get().await?;
        let mut members: Vec<String> = conn.smembers(Self::typing_key(room_id)).await?;
        members.sort();
        Ok(members)
    }
}

#[async_trait]
impl PresenceRepository for PresenceStore {
    async fn set_online(&self, user_id: &str) -> RepoResult<()> {
        self.mark_online(user_id).await?;
        tracing::debug!(user_id = %user_id, "Set user online");
        Ok(())
    }

    async fn set_offline(&self, user_id: &str) -> RepoResult<()> {
        self.clear_online(user_id).await?;
        tracing::debug!(user_id = %user_id, "Set user offline");
        Ok(())
    }

    async fn is_online(&self, user_id: &str) -> RepoResult<bool> {
        Ok(self.has_online(user_id).await?)
    }

    async fn add_typing(&self, room_id: &str, user_id: &str) -> RepoResult<()> {
        self.start_typing(room_id, user_id).await?;
        tracing::trace!(user_id = %user_id, room_id = %room_id, "Set typing indicator");
        Ok(())
    }

    async fn remove_typing(&self, room_id: &str, user_id: &str) -> RepoResult<()> {
        Ok(self.stop_typing(room_id, user_id).await?)
    }

    async fn list_typing(&self, room_id: &str) -> RepoResult<Vec<String>> {
        Ok(self.typing_members(room_id).await?)
    }
}
