//! send_message handler

use chat_service::{dto::SendMessageRequest, MessageService};
use uuid::Uuid;

use super::{HandlerError, HandlerResult};
use crate::connection::Session;
use crate::protocol::{SendMessagePayload, ServerEvent};
use crate::server::GatewayState;

/// Persists a message, then fans it out to the whole room
pub struct MessageHandler;

impl MessageHandler {
    /// The broadcast includes the sender's own session. Nothing is broadcast
    /// unless the message was stored.
    pub async fn handle(
        state: &GatewayState,
        session: &Session,
        payload: SendMessagePayload,
    ) -> HandlerResult<()> {
        let room_id = Uuid::parse_str(payload.room_id.trim())
            .map_err(|_| HandlerError::InvalidPayload(format!("invalid roomId: {}", payload.room_id)))?;

        let request = SendMessageRequest {
            room_id,
            content: payload.content,
            kind: payload.kind,
            metadata: payload.metadata,
        };

        let message = MessageService::new(state.service_context())
            .send(session.user_id(), request)
            .await?;

        let report = state.hub().broadcast_to_room(
            &message.room_id.to_string(),
            &ServerEvent::new_message(&message),
            None,
        )?;

        tracing::debug!(
            session_id = %session.id(),
            message_id = %message.id,
            delivered = report.delivered,
            "Message broadcast"
        );
        Ok(())
    }
}
