//! typing handler

use chat_service::PresenceService;

use super::room::require_room;
use super::HandlerResult;
use crate::connection::Session;
use crate::protocol::{ServerEvent, TypingPayload};
use crate::server::GatewayState;

/// Records a typing start/stop and tells the rest of the room
pub struct TypingHandler;

impl TypingHandler {
    pub async fn handle(
        state: &GatewayState,
        session: &Session,
        payload: TypingPayload,
    ) -> HandlerResult<()> {
        let room_id = require_room(&payload.room_id)?;

        // Presence is best effort; the indicator is still relayed
        if let Err(e) = PresenceService::new(state.service_context())
            .set_typing(&room_id, session.user_id(), payload.is_typing)
            .await
        {
            tracing::warn!(
                session_id = %session.id(),
                room_id = %room_id,
                error = %e,
                "Failed to update typing marker"
            );
        }

        state.hub().broadcast_to_room(
            &room_id,
            &ServerEvent::user_typing(room_id.as_str(), session.user_id(), payload.is_typing),
            Some(session.id()),
        )?;
        Ok(())
    }
}
