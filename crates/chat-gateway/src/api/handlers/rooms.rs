//! Room handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::dto::{CreateRoomRequest, RoomResponse};
use chat_service::RoomService;

use crate::api::extractors::{AuthUser, ValidatedJson};
use crate::api::response::{ApiResult, Created};
use crate::server::GatewayState;

/// Rooms the caller belongs to, most recently active first
///
/// GET /rooms
pub async fn list_rooms(
    State(state): State<GatewayState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<RoomResponse>>> {
    let rooms = RoomService::new(state.service_context())
        .list_for_user(&auth.user_id)
        .await?;
    Ok(Json(rooms.iter().map(RoomResponse::from).collect()))
}

/// Create a room with the caller as admin
///
/// POST /rooms
pub async fn create_room(
    State(state): State<GatewayState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<Created<Json<RoomResponse>>> {
    let room = RoomService::new(state.service_context())
        .create(&auth.user_id, request)
        .await?;
    Ok(Created(Json(RoomResponse::from(room))))
}

/// GET /rooms/{room_id}
pub async fn get_room(
    State(state): State<GatewayState>,
    _auth: AuthUser,
    Path(room_id): Path<String>,
) -> ApiResult<Json<RoomResponse>> {
    let room_id = super::parse_room_id(&room_id)?;
    let room = RoomService::new(state.service_context()).get(room_id).await?;
    Ok(Json(RoomResponse::from(room)))
}
