//! # chat-gateway
//!
//! Real-time room messaging over WebSocket, plus the REST surface for rooms,
//! message history and presence.

pub mod api;
pub mod connection;
pub mod handlers;
pub mod hub;
pub mod protocol;
pub mod server;

pub use connection::{EnqueueError, Frame, Session, SessionId};
pub use hub::{BroadcastReport, Envelope, Hub};
pub use server::{create_app, create_gateway_state, run, run_server, serve_connection, GatewayState};
