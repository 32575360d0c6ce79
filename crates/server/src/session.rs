//! Session stash with time-to-live.
//!
//! A session ties a random id (handed to the client in redirects) to the
//! logged-in user and, once computed, their ranked timeline. Entries expire
//! after their TTL; expired entries are invisible to [`SessionStore::get`] and
//! reclaimed by [`SessionStore::purge_expired`].

use crate::auth::UserInfo;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tweetview_core::Item;

/// Payload stored under a session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserInfo,
    /// Ranked timeline, `None` until the pipeline ran for this session.
    #[serde(default)]
    pub relevant_items: Option<Vec<Item>>,
}

impl Session {
    /// A session for `user` with no ranked timeline yet.
    pub fn new(user: UserInfo) -> Self {
        Self {
            user,
            relevant_items: None,
        }
    }
}

/// Session collaborator: a key-value store with per-entry TTL.
pub trait SessionStore: Send + Sync {
    fn get(&self, sid: &str) -> Option<Session>;
    fn set(&self, sid: &str, session: Session, ttl: Duration);
    fn remove(&self, sid: &str) -> Option<Session>;
    /// Number of live (unexpired) sessions.
    fn len(&self) -> usize;
    /// Drop expired entries, returning how many were removed.
    fn purge_expired(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generate a fresh, unguessable session id.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// In-process session store.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, (Session, Instant)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, sid: &str) -> Option<Session> {
        let entries = self.entries.read();
        entries
            .get(sid)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(session, _)| session.clone())
    }

    fn set(&self, sid: &str, session: Session, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries
            .write()
            .insert(sid.to_string(), (session, expires_at));
    }

    fn remove(&self, sid: &str) -> Option<Session> {
        self.entries.write().remove(sid).map(|(session, _)| session)
    }

    fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .values()
            .filter(|(_, expires_at)| now < *expires_at)
            .count()
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, (_, expires_at)| now < *expires_at);
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(username: &str) -> Session {
        Session::new(UserInfo {
            username: username.into(),
            token: "token".into(),
            secret: String::new(),
        })
    }

    #[test]
    fn test_set_then_get() {
        let store = MemorySessionStore::new();
        store.set("sid-1", session("alice"), Duration::from_secs(600));
        let found = store.get("sid-1").unwrap();
        assert_eq!(found.user.username, "alice");
        assert!(found.relevant_items.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_sid() {
        let store = MemorySessionStore::new();
        assert!(store.get("missing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let store = MemorySessionStore::new();
        store.set("sid", session("alice"), Duration::from_secs(600));
        let mut updated = session("alice");
        updated.relevant_items = Some(vec![Item::new("hello")]);
        store.set("sid", updated, Duration::from_secs(600));
        assert_eq!(store.get("sid").unwrap().relevant_items.unwrap().len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_expired_entries_are_invisible_and_purged() {
        let store = MemorySessionStore::new();
        store.set("old", session("alice"), Duration::ZERO);
        store.set("live", session("bob"), Duration::from_secs(600));
        assert!(store.get("old").is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.purge_expired(), 0);
        assert!(store.get("live").is_some());
    }

    #[test]
    fn test_remove() {
        let store = MemorySessionStore::new();
        store.set("sid", session("alice"), Duration::from_secs(600));
        assert_eq!(store.remove("sid").unwrap().user.username, "alice");
        assert!(store.get("sid").is_none());
        assert!(store.remove("sid").is_none());
    }

    #[test]
    fn test_session_ids_are_unique_hex() {
        let a = new_session_id();
        let b = new_session_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
