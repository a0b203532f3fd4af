//! Bearer-token sessions.
//!
//! A token is an opaque 32-character hex string (16 random bytes) mapped to
//! the user it was issued for. Sessions live in process memory only and are
//! never persisted. Every session carries an expiry; an expired token is
//! treated exactly like an unknown one.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;

pub const TOKEN_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Storage for issued tokens. Implementations must be safe to share between threads.
pub trait SessionStore: Send + Sync {
    /// Creates a new token for `user_id` valid until `now + ttl`.
    fn issue(&self, user_id: i64, username: &str, now: DateTime<Utc>) -> String;

    /// Returns the live session for `token`. Expired sessions are dropped and reported as absent.
    fn lookup(&self, token: &str, now: DateTime<Utc>) -> Option<Session>;

    /// Removes `token`. Returns whether it existed.
    fn revoke(&self, token: &str) -> bool;

    /// Drops every session that has expired at `now` and returns how many were removed.
    fn expire(&self, now: DateTime<Utc>) -> usize;
}

/// Generates a random token: 16 bytes, hex-encoded.
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
    hex::encode(bytes)
}

#[derive(Debug)]
pub struct MemorySessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn issue(&self, user_id: i64, username: &str, now: DateTime<Utc>) -> String {
        let mut sessions = self.sessions.lock();
        let mut token = generate_token();
        while sessions.contains_key(&token) {
            token = generate_token();
        }

        sessions.insert(
            token.clone(),
            Session {
                user_id,
                username: username.to_string(),
                issued_at: now,
                expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            },
        );
        tracing::debug!(user_id, "session issued");
        token
    }

    fn lookup(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        let mut sessions = self.sessions.lock();
        match sessions.get(token) {
            Some(session) if session.is_expired(now) => {
                tracing::debug!(user_id = session.user_id, "session expired");
                sessions.remove(token);
                None
            }
            Some(session) => Some(session.clone()),
            None => None,
        }
    }

    fn revoke(&self, token: &str) -> bool {
        self.sessions.lock().remove(token).is_some()
    }

    fn expire(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_32_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn lookup_respects_ttl() {
        let store = MemorySessionStore::new(Duration::minutes(30));
        let now = Utc::now();
        let token = store.issue(7, "alice", now);

        let session = store.lookup(&token, now + Duration::minutes(29)).unwrap();
        assert_eq!(session.user_id, 7);
        assert_eq!(session.username, "alice");

        assert!(store.lookup(&token, now + Duration::minutes(30)).is_none());
        // expired entries are removed on lookup
        assert!(store.is_empty());
    }

    #[test]
    fn revoke_removes_one_token() {
        let store = MemorySessionStore::new(Duration::minutes(5));
        let now = Utc::now();
        let first = store.issue(1, "alice", now);
        let second = store.issue(1, "alice", now);

        assert!(store.revoke(&first));
        assert!(!store.revoke(&first));
        assert!(store.lookup(&first, now).is_none());
        assert!(store.lookup(&second, now).is_some());
    }

    #[test]
    fn expire_purges_only_stale_sessions() {
        let store = MemorySessionStore::new(Duration::minutes(10));
        let start = Utc::now();
        store.issue(1, "alice", start);
        store.issue(2, "bob", start + Duration::minutes(5));

        assert_eq!(store.expire(start + Duration::minutes(12)), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.expire(start + Duration::minutes(20)), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn oversized_ttl_saturates() {
        let store = MemorySessionStore::new(Duration::MAX);
        let now = Utc::now();
        let token = store.issue(3, "carol", now);

        let session = store.lookup(&token, now + Duration::days(365 * 1000)).unwrap();
        assert_eq!(session.expires_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn unknown_token_is_absent() {
        let store = MemorySessionStore::new(Duration::minutes(10));
        assert!(store.lookup("deadbeef", Utc::now()).is_none());
    }
}
