//! REST surface
//!
//! Room, message and presence endpoints served next to the WebSocket route.
//! Every route except `/health` requires a bearer token.

pub mod extractors;
pub mod handlers;
pub mod response;

pub use extractors::{AuthUser, Pagination, ValidatedJson};
pub use response::{ApiError, ApiResult, Created};

use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;

use crate::server::GatewayState;
use handlers::{health, messages, presence, rooms};

/// Upper bound on a single REST request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// REST routes
pub fn routes() -> Router<GatewayState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/rooms/:room_id", get(rooms::get_room))
        .route("/rooms/:room_id/messages", get(messages::list_messages))
        .route("/rooms/:room_id/typing", get(presence::typing_users))
        .route("/messages", post(messages::send_message))
        .route("/users/:user_id/presence", get(presence::user_presence))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
}
