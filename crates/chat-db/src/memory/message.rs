//! In-memory MessageRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use chat_core::{Message, MessageRepository, NewMessage, RepoResult};

/// Messages kept per room in insertion order
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    rooms: RwLock<HashMap<Uuid, Vec<Message>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: NewMessage) -> RepoResult<Message> {
        let message = Message::from_new(message, Uuid::new_v4(), Utc::now());
        self.rooms
            .write()
            .entry(message.room_id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn find_by_room(&self, room_id: Uuid, limit: i64, offset: i64) -> RepoResult<Vec<Message>> {
        let rooms = self.rooms.read();
        let Some(messages) = rooms.get(&room_id) else {
            return Ok(Vec::new());
        };

        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);

        let mut page: Vec<Message> = messages
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        page.reverse();
        Ok(page)
    }
}
