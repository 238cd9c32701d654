//! Message handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::dto::{MessageResponse, SendMessageRequest};
use chat_service::MessageService;

use crate::api::extractors::{AuthUser, Pagination, ValidatedJson};
use crate::api::response::{ApiResult, Created};
use crate::protocol::ServerEvent;
use crate::server::GatewayState;

/// Page of room history, oldest first
///
/// GET /rooms/{room_id}/messages?limit=&offset=
pub async fn list_messages(
    State(state): State<GatewayState>,
    _auth: AuthUser,
    Path(room_id): Path<String>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let room_id = super::parse_room_id(&room_id)?;
    let messages = MessageService::new(state.service_context())
        .list(room_id, pagination.limit, pagination.offset)
        .await?;
    Ok(Json(messages.iter().map(MessageResponse::from).collect()))
}

/// Persist a message and push it to the room's live sessions
///
/// POST /messages
pub async fn send_message(
    State(state): State<GatewayState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let message = MessageService::new(state.service_context())
        .send(&auth.user_id, request)
        .await?;

    match state.hub().broadcast_to_room(
        &message.room_id.to_string(),
        &ServerEvent::new_message(&message),
        None,
    ) {
        Ok(report) => tracing::debug!(
            message_id = %message.id,
            delivered = report.delivered,
            "Message broadcast"
        ),
        Err(e) => tracing::warn!(message_id = %message.id, error = %e, "Failed to broadcast message"),
    }

    Ok(Created(Json(MessageResponse::from(message))))
}
