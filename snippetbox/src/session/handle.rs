use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::{Mutex, MutexGuard};

use super::types::StoredSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SessionStatus {
    Unmodified,
    Modified,
    Destroyed,
}

#[derive(Debug)]
pub(super) struct SessionState {
    /// Bare (unsigned) token; `None` until the session is first written.
    pub(super) token: Option<String>,
    pub(super) values: Map<String, Value>,
    pub(super) expires_at: Option<DateTime<Utc>>,
    pub(super) status: SessionStatus,
    /// Record to delete from the backing store on save, left behind by renew/destroy.
    pub(super) stale_token: Option<String>,
}

/// Request-scoped handle on one browser session.
///
/// Clones share the same state, so every stage of a request observes the same
/// snapshot. Changes are written back once, by [`SessionStore::save`](super::SessionStore::save).
#[derive(Clone, Debug)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh, empty session. It gets a token the first time it is saved with data.
    pub fn new() -> Self {
        Self::from_state(SessionState {
            token: None,
            values: Map::new(),
            expires_at: None,
            status: SessionStatus::Unmodified,
            stale_token: None,
        })
    }

    pub(super) fn from_stored(token: String, stored: StoredSession) -> Self {
        Self::from_state(SessionState {
            token: Some(token),
            values: stored.values,
            expires_at: Some(stored.expires_at),
            status: SessionStatus::Unmodified,
            stale_token: None,
        })
    }

    fn from_state(state: SessionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub(super) async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().await
    }

    pub async fn exists(&self, key: &str) -> bool {
        self.inner.lock().await.values.contains_key(key)
    }

    /// Integer stored under `key`, or `None` when absent or not an integer.
    pub async fn get_int(&self, key: &str) -> Option<i64> {
        self.inner.lock().await.values.get(key).and_then(Value::as_i64)
    }

    pub async fn get_string(&self, key: &str) -> Option<String> {
        self.inner
            .lock()
            .await
            .values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    pub async fn put(&self, key: &str, value: impl Into<Value>) {
        let mut state = self.inner.lock().await;
        state.values.insert(key.to_string(), value.into());
        state.status = SessionStatus::Modified;
    }

    pub async fn remove(&self, key: &str) {
        let mut state = self.inner.lock().await;
        if state.values.remove(key).is_some() {
            state.status = SessionStatus::Modified;
        }
    }

    /// Read the string under `key` and delete it. Returns an empty string when absent.
    pub async fn pop_string(&self, key: &str) -> String {
        let mut state = self.inner.lock().await;
        match state.values.remove(key) {
            Some(value) => {
                state.status = SessionStatus::Modified;
                value.as_str().map(str::to_string).unwrap_or_default()
            }
            None => String::new(),
        }
    }

    /// Keep the data but move it to a fresh token; the old record is deleted on save.
    ///
    /// The CSRF token is dropped with the old token and reissued on the next safe request.
    pub async fn renew_token(&self) {
        let mut state = self.inner.lock().await;
        if let Some(old) = state.token.take() {
            state.stale_token = Some(old);
        }
        state.values.remove(super::csrf::CSRF_SESSION_KEY);
        state.expires_at = None;
        state.status = SessionStatus::Modified;
    }

    /// Drop all data and expire the session cookie on save.
    pub async fn destroy(&self) {
        let mut state = self.inner.lock().await;
        if let Some(old) = state.token.take() {
            state.stale_token = Some(old);
        }
        state.values.clear();
        state.expires_at = None;
        state.status = SessionStatus::Destroyed;
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.lock().await.token.clone()
    }
}
