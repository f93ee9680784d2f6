//! Authentication and session state.
//!
//! Sessions are keyed by an opaque bearer token and expire on wall-clock
//! time. Callers pass `now` explicitly so expiry is testable without
//! sleeping.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{SessionToken, UserId};

/// A platform user as seen by the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Name shown in the UI.
    pub display_name: String,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh ID.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            display_name: display_name.into(),
            created_at: Utc::now(),
        }
    }
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    /// The signed-in user.
    pub user: User,
    /// When the session was started.
    pub started_at: DateTime<Utc>,
    /// When the session stops being valid.
    pub expires_at: DateTime<Utc>,
}

/// Thread-safe session store. `Clone` shares the underlying state.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<SessionToken, Session>>,
}

impl SessionStore {
    /// Create an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Start a session for a user, valid for `ttl` from `now`.
    pub fn start_session(&self, user: User, ttl: Duration, now: DateTime<Utc>) -> SessionToken {
        let token = SessionToken::new();
        self.sessions.insert(
            token,
            Session {
                user,
                started_at: now,
                expires_at: now + ttl,
            },
        );
        debug!(token = %token, "session started");
        token
    }

    /// The user behind a token, if the session exists and has not expired.
    #[must_use]
    pub fn user(&self, token: SessionToken, now: DateTime<Utc>) -> Option<User> {
        self.sessions
            .get(&token)
            .filter(|s| s.expires_at > now)
            .map(|s| s.user.clone())
    }

    /// Whether a token identifies a live session.
    #[must_use]
    pub fn is_authenticated(&self, token: SessionToken, now: DateTime<Utc>) -> bool {
        self.user(token, now).is_some()
    }

    /// End a session. Returns whether a session was removed.
    pub fn end_session(&self, token: SessionToken) -> bool {
        self.sessions.remove(&token).is_some()
    }

    /// Remove every expired session. Returns how many were dropped.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.expires_at > now);
        before - self.sessions.len()
    }

    /// Number of stored sessions (live and expired-but-unpurged).
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
