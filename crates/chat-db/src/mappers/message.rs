//! Message model -> entity mapper

use chat_core::{DomainError, Message};

use crate::models::MessageModel;

impl TryFrom<MessageModel> for Message {
    type Error = DomainError;

    fn try_from(model: MessageModel) -> Result<Self, Self::Error> {
        Ok(Message {
            id: model.id,
            room_id: model.room_id,
            sender_id: model.sender_id,
            content: model.content,
            kind: model.kind.parse().map_err(DomainError::DatabaseError)?,
            metadata: model.metadata,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
