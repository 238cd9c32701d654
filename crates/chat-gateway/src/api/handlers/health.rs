//! Health check handler

use axum::{extract::State, Json};
use chat_service::dto::HealthResponse;

use crate::server::GatewayState;

/// Liveness check
///
/// GET /health
pub async fn health_check(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.service_name()))
}
