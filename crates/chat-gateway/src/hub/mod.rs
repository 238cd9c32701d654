//! Session registry and room fan-out
//!
//! The [`Hub`] owns the session table and room index behind one lock.
//! Register, unregister, join, leave and broadcast each mutate state inside a
//! single critical section. Nothing awaits while the lock is held; presence
//! writes happen after it is released.

mod envelope;
mod registry;

pub use envelope::{BroadcastReport, Envelope};

use std::collections::HashSet;
use std::sync::Arc;

use chat_core::PresenceRepository;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::connection::{EnqueueError, Session, SessionId};
use registry::Registry;

/// Registry of live sessions and the rooms they joined
pub struct Hub {
    registry: Mutex<Registry>,
    presence: Arc<dyn PresenceRepository>,
}

impl Hub {
    pub fn new(presence: Arc<dyn PresenceRepository>) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            presence,
        }
    }

    /// Register a session as the one live session of its identity
    ///
    /// A prior session of the same identity is torn down first. After
    /// [`Hub::shutdown`] the session is closed instead and `false` is returned.
    pub async fn register(&self, session: Arc<Session>) -> bool {
        let user_id = session.user_id().to_string();
        let session_id = session.id();

        let evicted = {
            let mut registry = self.registry.lock();
            if registry.is_closed() {
                drop(registry);
                session.close();
                debug!(user_id = %user_id, session_id = %session_id, "Hub shut down, session refused");
                return false;
            }
            registry.insert(session)
        };
        if let Some(previous) = evicted {
            info!(
                user_id = %user_id,
                session_id = %previous.id(),
                replaced_by = %session_id,
                "Replaced existing session"
            );
        }

        self.mark_online(&user_id).await;
        info!(user_id = %user_id, session_id = %session_id, "Session registered");
        true
    }

    /// Tear down a session and clear its identity's online marker
    ///
    /// Stale calls (the session was already removed or replaced) leave the
    /// registry untouched. Returns whether this call removed the session.
    pub async fn unregister(&self, session: &Session) -> bool {
        let user_id = session.user_id();
        let (removed, superseded) = {
            let mut registry = self.registry.lock();
            let removed = registry.remove(session.id()).is_some();
            (removed, registry.current(user_id).is_some())
        };

        if removed {
            info!(user_id = %user_id, session_id = %session.id(), "Session unregistered");
        }

        if !superseded {
            self.mark_offline(user_id).await;
            // A newer session may have registered while the marker was cleared
            let reregistered = self.registry.lock().current(user_id).is_some();
            if reregistered {
                self.mark_online(user_id).await;
            }
        }

        removed
    }

    /// Add a session to a room, creating the room if needed
    ///
    /// Returns `false` when the session was already a member or is no
    /// longer registered.
    pub fn join(&self, session: &Session, room_id: &str) -> bool {
        let joined = self.registry.lock().join(session.id(), room_id);
        debug!(session_id = %session.id(), room_id = %room_id, joined, "Join room");
        joined
    }

    /// Remove a session from a room. Empty rooms are dropped.
    pub fn leave(&self, session: &Session, room_id: &str) -> bool {
        let left = self.registry.lock().leave(session.id(), room_id);
        debug!(session_id = %session.id(), room_id = %room_id, left, "Leave room");
        left
    }

    /// Queue the envelope's frame on every room member except the excluded one
    ///
    /// A member whose queue is full is torn down in the same critical section.
    pub fn broadcast(&self, envelope: &Envelope) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let mut registry = self.registry.lock();

        for member in registry.members(envelope.room_id()) {
            if Some(member.id()) == envelope.exclude() {
                continue;
            }
            match member.enqueue(Arc::clone(envelope.frame())) {
                Ok(()) => report.delivered += 1,
                Err(EnqueueError::Full) => {
                    registry.remove(member.id());
                    report.dropped += 1;
                    warn!(
                        session_id = %member.id(),
                        user_id = %member.user_id(),
                        room_id = %envelope.room_id(),
                        "Outbound queue overflow, session torn down"
                    );
                }
                Err(EnqueueError::Closed) => report.dropped += 1,
            }
        }
        drop(registry);

        trace!(
            room_id = %envelope.room_id(),
            delivered = report.delivered,
            dropped = report.dropped,
            "Broadcast"
        );
        report
    }

    /// Serialize `payload` once and broadcast it to a room
    pub fn broadcast_to_room<T: Serialize + ?Sized>(
        &self,
        room_id: &str,
        payload: &T,
        exclude: Option<SessionId>,
    ) -> serde_json::Result<BroadcastReport> {
        let envelope = Envelope::from_payload(room_id, payload)?.excluding(exclude);
        Ok(self.broadcast(&envelope))
    }

    /// Close every session and clear all state
    ///
    /// Returns the number of sessions closed.
    pub async fn shutdown(&self) -> usize {
        let sessions = self.registry.lock().drain();

        let users: HashSet<&str> = sessions.iter().map(|s| s.user_id()).collect();
        for user_id in users {
            self.mark_offline(user_id).await;
        }

        info!(sessions = sessions.len(), "Hub shut down");
        sessions.len()
    }

    // === Introspection ===

    pub fn is_registered(&self, session_id: SessionId) -> bool {
        self.registry.lock().contains(session_id)
    }

    /// Current session of an identity
    pub fn session_for(&self, user_id: &str) -> Option<SessionId> {
        self.registry.lock().current(user_id)
    }

    pub fn room_members(&self, room_id: &str) -> Vec<SessionId> {
        self.registry.lock().member_ids(room_id)
    }

    pub fn rooms_of(&self, session_id: SessionId) -> Vec<String> {
        self.registry.lock().rooms_of(session_id)
    }

    pub fn session_count(&self) -> usize {
        self.registry.lock().session_count()
    }

    pub fn room_count(&self) -> usize {
        self.registry.lock().room_count()
    }

    // === Presence ===

    async fn mark_online(&self, user_id: &str) {
        if let Err(e) = self.presence.set_online(user_id).await {
            warn!(user_id = %user_id, error = %e, "Failed to set user online");
        }
    }

    async fn mark_offline(&self, user_id: &str) {
        if let Err(e) = self.presence.set_offline(user_id).await {
            warn!(user_id = %user_id, error = %e, "Failed to set user offline");
        }
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("Hub")
            .field("sessions", &registry.session_count())
            .field("rooms", &registry.room_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_cache::InMemoryPresenceStore;

    fn hub() -> (Hub, Arc<InMemoryPresenceStore>) {
        let presence = Arc::new(InMemoryPresenceStore::new());
        (Hub::new(presence.clone()), presence)
    }

    #[tokio::test]
    async fn test_register_marks_online() {
        let (hub, presence) = hub();
        let (session, _rx) = Session::new("alice", 4);

        assert!(hub.register(Arc::clone(&session)).await);

        assert!(hub.is_registered(session.id()));
        assert!(presence.is_online("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_after_shutdown_is_refused() {
        let (hub, presence) = hub();
        hub.shutdown().await;

        let (late, mut rx) = Session::new("alice", 4);
        assert!(!hub.register(Arc::clone(&late)).await);

        assert!(late.is_closed());
        assert!(rx.recv().await.is_none());
        assert_eq!(hub.session_count(), 0);
        assert!(!presence.is_online("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let (hub, presence) = hub();
        let (session, _rx) = Session::new("alice", 4);
        hub.register(Arc::clone(&session)).await;
        hub.join(&session, "general");

        assert!(hub.unregister(&session).await);
        assert!(!hub.unregister(&session).await);

        assert!(session.is_closed());
        assert_eq!(hub.room_count(), 0);
        assert!(!presence.is_online("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_stale_unregister_keeps_newer_session_online() {
        let (hub, presence) = hub();
        let (first, _rx1) = Session::new("alice", 4);
        let (second, _rx2) = Session::new("alice", 4);
        hub.register(Arc::clone(&first)).await;
        hub.register(Arc::clone(&second)).await;

        assert!(!hub.unregister(&first).await);

        assert!(hub.is_registered(second.id()));
        assert!(presence.is_online("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_join_after_teardown_is_noop() {
        let (hub, _presence) = hub();
        let (session, _rx) = Session::new("alice", 4);
        hub.register(Arc::clone(&session)).await;
        hub.unregister(&session).await;

        assert!(!hub.join(&session, "general"));
        assert_eq!(hub.room_count(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_to_unknown_room() {
        let (hub, _presence) = hub();
        let report = hub.broadcast(&Envelope::new("nowhere", "x"));
        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test]
    async fn test_shutdown_clears_state() {
        let (hub, presence) = hub();
        let (alice, mut rx) = Session::new("alice", 4);
        let (bob, _rx_b) = Session::new("bob", 4);
        hub.register(Arc::clone(&alice)).await;
        hub.register(Arc::clone(&bob)).await;
        hub.join(&alice, "general");

        assert_eq!(hub.shutdown().await, 2);

        assert_eq!(hub.session_count(), 0);
        assert_eq!(hub.room_count(), 0);
        assert!(rx.recv().await.is_none());
        assert_eq!(presence.online_count(), 0);
    }
}
