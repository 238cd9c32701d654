//! Per-connection driver
//!
//! Runs the inbound and outbound pumps for one verified connection and tears
//! the session down when either pump ends or the hub closes the session.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use chat_common::HubConfig;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};

use crate::connection::{Frame, Session, SessionId};
use crate::handlers::MessageDispatcher;
use crate::server::GatewayState;

/// Serve one connection for an already verified identity
///
/// Registers a session with the hub, pumps frames both ways and returns once
/// the session is torn down. `Hub::unregister` is called exactly once for a
/// registered session. When the hub closes the session (queue overflow, a
/// newer login of the same identity, shutdown) both pumps are aborted without
/// draining the queue.
pub async fn serve_connection<S, R, E>(state: GatewayState, user_id: String, sink: S, stream: R)
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display + Send,
    R: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
    E: Display + Send + 'static,
{
    let config = *state.hub_config();
    let (session, rx) = Session::new(user_id, config.outbound_queue_capacity);
    if !state.hub().register(Arc::clone(&session)).await {
        return;
    }

    let mut outbound = tokio::spawn(outbound_pump(session.id(), rx, sink, config));
    let mut inbound = tokio::spawn(inbound_pump(
        state.clone(),
        Arc::clone(&session),
        stream,
        config.idle_timeout,
    ));

    tokio::select! {
        _ = &mut inbound => {
            tracing::debug!(session_id = %session.id(), "Inbound pump ended");
        }
        _ = &mut outbound => {
            tracing::debug!(session_id = %session.id(), "Outbound pump ended");
        }
        () = session.closed() => {
            tracing::debug!(session_id = %session.id(), "Session closed by hub");
        }
    }
    inbound.abort();
    outbound.abort();

    state.hub().unregister(&session).await;
}

/// Read frames one at a time and hand text frames to the dispatcher
///
/// Ends when nothing arrives within `idle_timeout`. Pongs to the server's
/// pings count as traffic.
async fn inbound_pump<R, E>(
    state: GatewayState,
    session: Arc<Session>,
    mut stream: R,
    idle_timeout: Duration,
) where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    loop {
        let frame = match timeout(idle_timeout, stream.next()).await {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(_) => {
                tracing::info!(session_id = %session.id(), "Connection idle, closing");
                return;
            }
        };

        match frame {
            Ok(Message::Text(text)) => {
                MessageDispatcher::handle_text(&state, &session, &text).await;
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(session_id = %session.id(), "Binary frames not supported, discarded");
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                tracing::trace!(session_id = %session.id(), "Ping/pong received");
            }
            Ok(Message::Close(_)) => {
                tracing::info!(session_id = %session.id(), "Client closed connection");
                return;
            }
            Err(e) => {
                tracing::debug!(session_id = %session.id(), error = %e, "WebSocket read error");
                return;
            }
        }
    }
}

/// Write queued frames in order until the queue closes or a write fails
///
/// A ping goes out every `ping_interval`. Every write is bounded by
/// `write_timeout`.
async fn outbound_pump<S>(
    session_id: SessionId,
    mut rx: mpsc::Receiver<Frame>,
    mut sink: S,
    config: HubConfig,
) where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let mut ping = interval_at(Instant::now() + config.ping_interval, config.ping_interval);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let message = tokio::select! {
            frame = rx.recv() => match frame {
                Some(frame) => Message::Text(frame.to_string()),
                None => break,
            },
            _ = ping.tick() => Message::Ping(Vec::new()),
        };

        match timeout(config.write_timeout, sink.send(message)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(session_id = %session_id, error = %e, "WebSocket write failed");
                break;
            }
            Err(_) => {
                tracing::warn!(session_id = %session_id, "WebSocket write timed out");
                break;
            }
        }
    }

    let _ = sink.close().await;
}
