//! Message service
//!
//! Handles message creation and room history queries.

use chat_core::{DomainError, Message, NewMessage};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::dto::SendMessageRequest;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Page size when the caller gives none
pub const DEFAULT_LIMIT: i64 = 50;
/// Largest page a caller may request
pub const MAX_LIMIT: i64 = 100;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Persist a message from `sender_id`
    ///
    /// The room must exist. Its `updated_at` is bumped so room listings
    /// surface recent activity first.
    #[instrument(skip(self, request), fields(room_id = %request.room_id))]
    pub async fn send(&self, sender_id: &str, request: SendMessageRequest) -> ServiceResult<Message> {
        request.validate()?;

        let new_message = NewMessage {
            room_id: request.room_id,
            sender_id: sender_id.to_string(),
            content: request.content,
            kind: request.kind,
            metadata: request.metadata,
        };
        if new_message.is_empty() {
            return Err(DomainError::EmptyContent.into());
        }

        if self.ctx.room_repo().find_by_id(new_message.room_id).await?.is_none() {
            return Err(DomainError::RoomNotFound(new_message.room_id).into());
        }

        let message = self.ctx.message_repo().create(new_message).await?;
        self.ctx.room_repo().touch(message.room_id).await?;

        info!(message_id = %message.id, sender_id = %sender_id, "Message created");

        Ok(message)
    }

    /// List a page of room history, oldest first
    ///
    /// `offset` counts back from the newest message.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        room_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> ServiceResult<Vec<Message>> {
        let limit = clamp_limit(limit);
        let offset = offset.unwrap_or(0).max(0);

        Ok(self
            .ctx
            .message_repo()
            .find_by_room(room_id, limit, offset)
            .await?)
    }
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(l) if l <= 0 => DEFAULT_LIMIT,
        Some(l) => l.min(MAX_LIMIT),
        None => DEFAULT_LIMIT,
    }
}
