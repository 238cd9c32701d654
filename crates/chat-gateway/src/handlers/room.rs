//! Room membership handlers (join_room / leave_room)

use super::{HandlerError, HandlerResult};
use crate::connection::Session;
use crate::protocol::{room_key, RoomRef};
use crate::server::GatewayState;

/// Handles room membership commands
pub struct RoomHandler;

impl RoomHandler {
    pub fn join(state: &GatewayState, session: &Session, payload: &RoomRef) -> HandlerResult<()> {
        let room_id = require_room(&payload.room_id)?;
        state.hub().join(session, &room_id);
        Ok(())
    }

    pub fn leave(state: &GatewayState, session: &Session, payload: &RoomRef) -> HandlerResult<()> {
        let room_id = require_room(&payload.room_id)?;
        state.hub().leave(session, &room_id);
        Ok(())
    }
}

pub(super) fn require_room(raw: &str) -> HandlerResult<String> {
    room_key(raw).ok_or_else(|| HandlerError::InvalidPayload("roomId is required".to_string()))
}
