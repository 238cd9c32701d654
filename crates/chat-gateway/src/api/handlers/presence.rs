//! Presence handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::dto::{PresenceResponse, TypingResponse};
use chat_service::PresenceService;

use crate::api::extractors::AuthUser;
use crate::api::response::{ApiError, ApiResult};
use crate::protocol::room_key;
use crate::server::GatewayState;

/// GET /rooms/{room_id}/typing
pub async fn typing_users(
    State(state): State<GatewayState>,
    _auth: AuthUser,
    Path(room_id): Path<String>,
) -> ApiResult<Json<TypingResponse>> {
    let room_id = room_key(&room_id).ok_or_else(|| ApiError::invalid_path("Empty room_id"))?;
    let user_ids = PresenceService::new(state.service_context())
        .typing_users(&room_id)
        .await?;
    Ok(Json(TypingResponse { room_id, user_ids }))
}

/// GET /users/{user_id}/presence
pub async fn user_presence(
    State(state): State<GatewayState>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<PresenceResponse>> {
    let online = PresenceService::new(state.service_context())
        .is_online(&user_id)
        .await?;
    Ok(Json(PresenceResponse { user_id, online }))
}
