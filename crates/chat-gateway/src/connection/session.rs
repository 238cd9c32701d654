//! Session management
//!
//! A session is one live, identity-verified connection. It owns the sending
//! half of a bounded outbound queue; the outbound pump owns the receiving half.
//! Closing the session also raises a teardown signal that the connection
//! driver waits on.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::watch;
use uuid::Uuid;

/// A serialized outbound frame, shared by every recipient of a broadcast
pub type Frame = Arc<str>;

/// Unique identifier of one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a new random session ID
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Why a frame could not be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnqueueError {
    /// The outbound queue is at capacity; the session cannot keep up
    #[error("outbound queue full")]
    Full,

    /// The session has already been torn down
    #[error("session closed")]
    Closed,
}

/// One live connection
pub struct Session {
    id: SessionId,
    user_id: String,
    /// `None` once closed. Dropping the only sender ends the outbound pump.
    sender: Mutex<Option<mpsc::Sender<Frame>>>,
    /// Flips to `true` exactly once, when the queue is closed
    torn_down: watch::Sender<bool>,
}

impl Session {
    /// Create a session and the receiving end of its outbound queue
    ///
    /// A capacity of zero is raised to one.
    pub fn new(user_id: impl Into<String>, capacity: usize) -> (Arc<Self>, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let session = Arc::new(Self {
            id: SessionId::generate(),
            user_id: user_id.into(),
            sender: Mutex::new(Some(tx)),
            torn_down: watch::Sender::new(false),
        });
        (session, rx)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Queue a frame without waiting
    pub fn enqueue(&self, frame: Frame) -> Result<(), EnqueueError> {
        let guard = self.sender.lock();
        let Some(sender) = guard.as_ref() else {
            return Err(EnqueueError::Closed);
        };
        sender.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => EnqueueError::Full,
            TrySendError::Closed(_) => EnqueueError::Closed,
        })
    }

    /// Close the outbound queue
    ///
    /// Returns `true` only for the call that actually closed it.
    pub fn close(&self) -> bool {
        let closed = self.sender.lock().take().is_some();
        if closed {
            self.torn_down.send_replace(true);
            tracing::trace!(session_id = %self.id, "Outbound queue closed");
        }
        closed
    }

    /// Resolves once the session has been closed, immediately if it already was
    pub async fn closed(&self) {
        let mut rx = self.torn_down.subscribe();
        // The sender lives in `self`, so the channel cannot close under us
        let _ = rx.wait_for(|torn_down| *torn_down).await;
    }

    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
