//! Command handlers
//!
//! Routes decoded client commands to the hub and the services.

mod error;
mod message;
mod room;
mod typing;

pub use error::{HandlerError, HandlerResult};
pub use message::MessageHandler;
pub use room::RoomHandler;
pub use typing::TypingHandler;

use crate::connection::Session;
use crate::protocol::ClientCommand;
use crate::server::GatewayState;

/// Dispatch incoming client commands to the appropriate handler
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle one command to completion
    ///
    /// Failures are reported to the caller for logging only; they never end
    /// the session.
    pub async fn dispatch(
        state: &GatewayState,
        session: &Session,
        command: ClientCommand,
    ) -> HandlerResult<()> {
        tracing::trace!(
            session_id = %session.id(),
            command = command.name(),
            "Dispatching command"
        );

        match command {
            ClientCommand::JoinRoom(payload) => RoomHandler::join(state, session, &payload),
            ClientCommand::LeaveRoom(payload) => RoomHandler::leave(state, session, &payload),
            ClientCommand::SendMessage(payload) => {
                MessageHandler::handle(state, session, payload).await
            }
            ClientCommand::Typing(payload) => TypingHandler::handle(state, session, payload).await,
        }
    }

    /// Decode a text frame and dispatch it, logging anything that goes wrong
    ///
    /// Frames from a session the hub already closed are dropped.
    pub async fn handle_text(state: &GatewayState, session: &Session, text: &str) {
        if session.is_closed() {
            tracing::trace!(session_id = %session.id(), "Session closed, frame dropped");
            return;
        }

        let command = match ClientCommand::parse(text) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!(
                    session_id = %session.id(),
                    error = %e,
                    "Discarding undecodable frame"
                );
                return;
            }
        };

        let name = command.name();
        if let Err(e) = Self::dispatch(state, session, command).await {
            if e.is_client_error() {
                tracing::debug!(session_id = %session.id(), command = name, error = %e, "Command rejected");
            } else {
                tracing::warn!(session_id = %session.id(), command = name, error = %e, "Command failed");
            }
        }
    }
}
