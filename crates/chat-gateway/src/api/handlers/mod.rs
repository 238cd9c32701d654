//! REST handlers

pub mod health;
pub mod messages;
pub mod presence;
pub mod rooms;

use uuid::Uuid;

use super::response::ApiError;

pub(crate) fn parse_room_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path("Invalid room_id format"))
}
