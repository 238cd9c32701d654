//! In-process presence store, used when no Redis is configured.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use chat_core::{PresenceRepository, RepoResult};
use parking_lot::Mutex;
use tokio::time::Instant;

use super::redis_store::TYPING_TTL;

#[derive(Debug)]
struct TypingSet {
    members: BTreeSet<String>,
    touched: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    online: HashSet<String>,
    typing: HashMap<String, TypingSet>,
}

/// Presence kept in process memory.
///
/// Mirrors the Redis layout: the whole typing set of a room lapses
/// `typing_ttl` after the most recent typing start.
#[derive(Debug)]
pub struct InMemoryPresenceStore {
    inner: Mutex<Inner>,
    typing_ttl: Duration,
}

impl Default for InMemoryPresenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPresenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_typing_ttl(Duration::from_secs(TYPING_TTL))
    }

    #[must_use]
    pub fn with_typing_ttl(typing_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            typing_ttl,
        }
    }

    /// Number of users currently marked online
    pub fn online_count(&self) -> usize {
        self.inner.lock().online.len()
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceStore {
    async fn set_online(&self, user_id: &str) -> RepoResult<()> {
        self.inner.lock().online.insert(user_id.to_string());
        Ok(())
    }

    async fn set_offline(&self, user_id: &str) -> RepoResult<()> {
        self.inner.lock().online.remove(user_id);
        Ok(())
    }

    async fn is_online(&self, user_id: &str) -> RepoResult<bool> {
        Ok(self.inner.lock().online.contains(user_id))
    }

    async fn add_typing(&self, room_id: &str, user_id: &str) -> RepoResult<()> {
        let now = Instant::now();
        let ttl = self.typing_ttl;
        let mut inner = self.inner.lock();
        let set = inner
            .typing
            .entry(room_id.to_string())
            .or_insert_with(|| TypingSet {
                members: BTreeSet::new(),
                touched: now,
            });
        if now.duration_since(set.touched) >= ttl {
            set.members.clear();
        }
        set.members.insert(user_id.to_string());
        set.touched = now;
        Ok(())
    }

    async fn remove_typing(&self, room_id: &str, user_id: &str) -> RepoResult<()> {
        let mut inner = self.inner.lock();
        if let Some(set) = inner.typing.get_mut(room_id) {
            set.members.remove(user_id);
            if set.members.is_empty() {
                inner.typing.remove(room_id);
            }
        }
        Ok(())
    }

    async fn list_typing(&self, room_id: &str) -> RepoResult<Vec<String>> {
        let mut inner = self.inner.lock();
        let expired = match inner.typing.get(room_id) {
            None => return Ok(Vec::new()),
            Some(set) => set.touched.elapsed() >= self.typing_ttl,
        };
        if expired {
            inner.typing.remove(room_id);
            return Ok(Vec::new());
        }
        Ok(inner
            .typing
            .get(room_id)
            .map(|set| set.members.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_online_marker_is_idempotent() {
        let store = InMemoryPresenceStore::new();

        store.set_online("alice").await.unwrap();
        store.set_online("alice").await.unwrap();
        assert!(store.is_online("alice").await.unwrap());
        assert_eq!(store.online_count(), 1);

        store.set_offline("alice").await.unwrap();
        store.set_offline("alice").await.unwrap();
        assert!(!store.is_online("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_typing_add_remove() {
        let store = InMemoryPresenceStore::new();

        store.add_typing("general", "bob").await.unwrap();
        store.add_typing("general", "alice").await.unwrap();
        store.add_typing("random", "carol").await.unwrap();
        assert_eq!(
            store.list_typing("general").await.unwrap(),
            vec!["alice".to_string(), "bob".to_string()]
        );

        store.remove_typing("general", "bob").await.unwrap();
        store.remove_typing("general", "nobody").await.unwrap();
        assert_eq!(store.list_typing("general").await.unwrap(), vec!["alice".to_string()]);
        assert_eq!(store.list_typing("random").await.unwrap(), vec!["carol".to_string()]);
        assert!(store.list_typing("unknown").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_typing_set_expires() {
        let store = InMemoryPresenceStore::with_typing_ttl(Duration::from_millis(20));

        store.add_typing("general", "alice").await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(store.list_typing("general").await.unwrap().is_empty());

        store.add_typing("general", "bob").await.unwrap();
        assert_eq!(store.list_typing("general").await.unwrap(), vec!["bob".to_string()]);
    }
}
