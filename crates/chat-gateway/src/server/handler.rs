//! WebSocket upgrade handler
//!
//! The bearer token is verified before the upgrade; a missing or invalid
//! token is rejected with 401 and no socket is opened.

use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use futures_util::StreamExt;
use serde::Deserialize;

use crate::api::ApiError;
use crate::server::{serve_connection, GatewayState};

/// Query parameters accepted on the upgrade request
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    #[serde(default)]
    pub token: Option<String>,
}

/// WebSocket gateway handler
///
/// GET /ws?token=<jwt> or with `Authorization: Bearer <jwt>`
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    Query(params): Query<ConnectParams>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let token = params
        .token
        .filter(|t| !t.is_empty())
        .or_else(|| bearer.map(|TypedHeader(Authorization(b))| b.token().to_string()))
        .ok_or(ApiError::MissingAuth)?;

    let user_id = state.jwt_service().verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected WebSocket upgrade");
        ApiError::from(e)
    })?;

    tracing::debug!(user_id = %user_id, "Upgrading connection");

    Ok(ws
        .on_upgrade(move |socket| async move {
            let (sink, stream) = socket.split();
            serve_connection(state, user_id, sink, stream).await;
        })
        .into_response())
}
