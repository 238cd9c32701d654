//! Broadcast envelope

use serde::Serialize;

use crate::connection::{Frame, SessionId};

/// A frame addressed to every member of one room
///
/// Built once and shared across all recipients.
#[derive(Debug, Clone)]
pub struct Envelope {
    room_id: String,
    frame: Frame,
    exclude: Option<SessionId>,
}

impl Envelope {
    pub fn new(room_id: impl Into<String>, frame: impl Into<Frame>) -> Self {
        Self {
            room_id: room_id.into(),
            frame: frame.into(),
            exclude: None,
        }
    }

    /// Serialize `payload` once into a new envelope
    pub fn from_payload<T: Serialize + ?Sized>(
        room_id: impl Into<String>,
        payload: &T,
    ) -> serde_json::Result<Self> {
        let json = serde_json::to_string(payload)?;
        Ok(Self::new(room_id, json))
    }

    /// Skip one session when fanning out
    #[must_use]
    pub fn excluding(mut self, session_id: Option<SessionId>) -> Self {
        self.exclude = session_id;
        self
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn exclude(&self) -> Option<SessionId> {
        self.exclude
    }
}

/// Outcome of one broadcast
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Frames queued successfully
    pub delivered: usize,
    /// Members whose queue was full or already closed
    pub dropped: usize,
}
