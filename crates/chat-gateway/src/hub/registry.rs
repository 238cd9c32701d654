//! Session table and room index
//!
//! Plain data guarded by the hub's lock. Every method runs inside one
//! critical section and never blocks.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::connection::{Session, SessionId};

#[derive(Debug, Default)]
pub(crate) struct Registry {
    /// Identity to its one live session
    by_user: HashMap<String, SessionId>,
    sessions: HashMap<SessionId, Arc<Session>>,
    /// Room to member sessions. Never holds an empty set.
    rooms: HashMap<String, HashSet<SessionId>>,
    /// Session to the rooms it joined
    joined: HashMap<SessionId, HashSet<String>>,
    /// Set by `drain`; no session is admitted afterwards
    closed: bool,
}

impl Registry {
    /// Insert a session, tearing down any prior session of the same identity
    ///
    /// Returns the evicted session.
    pub(crate) fn insert(&mut self, session: Arc<Session>) -> Option<Arc<Session>> {
        let evicted = self
            .by_user
            .get(session.user_id())
            .copied()
            .filter(|previous| *previous != session.id())
            .and_then(|previous| self.remove(previous));

        self.by_user
            .insert(session.user_id().to_string(), session.id());
        self.sessions.insert(session.id(), session);
        evicted
    }

    /// Tear down a session: detach it from every room and close its queue
    ///
    /// Returns `None` when the session is not registered.
    pub(crate) fn remove(&mut self, id: SessionId) -> Option<Arc<Session>> {
        let session = self.sessions.remove(&id)?;

        if self.by_user.get(session.user_id()) == Some(&id) {
            self.by_user.remove(session.user_id());
        }

        for room_id in self.joined.remove(&id).unwrap_or_default() {
            self.detach(&room_id, id);
        }

        session.close();
        Some(session)
    }

    /// Returns `true` when the session was not already a member
    pub(crate) fn join(&mut self, id: SessionId, room_id: &str) -> bool {
        if !self.sessions.contains_key(&id) {
            return false;
        }
        let added = self
            .rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(id);
        self.joined
            .entry(id)
            .or_default()
            .insert(room_id.to_string());
        added
    }

    /// Returns `true` when the session was a member
    pub(crate) fn leave(&mut self, id: SessionId, room_id: &str) -> bool {
        let Some(rooms) = self.joined.get_mut(&id) else {
            return false;
        };
        if !rooms.remove(room_id) {
            return false;
        }
        if rooms.is_empty() {
            self.joined.remove(&id);
        }
        self.detach(room_id, id);
        true
    }

    fn detach(&mut self, room_id: &str, id: SessionId) {
        if let Some(members) = self.rooms.get_mut(room_id) {
            members.remove(&id);
            if members.is_empty() {
                self.rooms.remove(room_id);
            }
        }
    }

    /// Snapshot of the sessions currently in a room
    pub(crate) fn members(&self, room_id: &str) -> Vec<Arc<Session>> {
        self.rooms
            .get(room_id)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|id| self.sessions.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn member_ids(&self, room_id: &str) -> Vec<SessionId> {
        self.rooms
            .get(room_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn rooms_of(&self, id: SessionId) -> Vec<String> {
        self.joined
            .get(&id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn current(&self, user_id: &str) -> Option<SessionId> {
        self.by_user.get(user_id).copied()
    }

    pub(crate) fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub(crate) fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub(crate) fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close and forget every session, and stop admitting new ones
    pub(crate) fn drain(&mut self) -> Vec<Arc<Session>> {
        self.closed = true;
        self.by_user.clear();
        self.rooms.clear();
        self.joined.clear();
        let sessions: Vec<_> = self.sessions.drain().map(|(_, s)| s).collect();
        for session in &sessions {
            session.close();
        }
        sessions
    }
}
