use std::sync::Arc;

use chrono::{Duration, Utc};
use http::HeaderMap;
use tokio::sync::Mutex;

use crate::storage::{CacheData, CacheStore, InMemoryCacheStore, SharedCacheStore};
use crate::utils::{gen_random_string, get_cookie_value, header_set_cookie};

use super::config::SessionConfig;
use super::errors::SessionError;
use super::handle::{Session, SessionStatus};
use super::token::{sign_token, verify_signed_token};
use super::types::StoredSession;

const SESSION_PREFIX: &str = "session";

/// Loads sessions from the signed cookie and writes them back to the cache store.
#[derive(Clone)]
pub struct SessionStore {
    cache: SharedCacheStore,
    config: Arc<SessionConfig>,
}

impl SessionStore {
    pub fn new(cache: Box<dyn CacheStore>, config: SessionConfig) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
            config: Arc::new(config),
        }
    }

    pub fn in_memory(config: SessionConfig) -> Self {
        Self::new(Box::new(InMemoryCacheStore::new()), config)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Resolve the session named by the request's cookie.
    ///
    /// A missing cookie, a bad signature, an unknown token, an unreadable record
    /// and an expired record all yield a fresh empty session.
    #[tracing::instrument(skip_all)]
    pub async fn load(&self, headers: &HeaderMap) -> Result<Session, SessionError> {
        let Some(signed) = get_cookie_value(headers, &self.config.cookie_name) else {
            tracing::trace!("No session cookie '{}' found", self.config.cookie_name);
            return Ok(Session::new());
        };

        let Some(token) = verify_signed_token(&self.config.secret, &signed) else {
            return Ok(Session::new());
        };

        let mut cache = self.cache.lock().await;
        let Some(cached) = cache.get(SESSION_PREFIX, &token).await? else {
            tracing::debug!("Session not found in store");
            return Ok(Session::new());
        };

        let stored: StoredSession = match cached.try_into() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Discarding unreadable session record: {}", e);
                cache.remove(SESSION_PREFIX, &token).await?;
                return Ok(Session::new());
            }
        };

        if stored.expires_at <= Utc::now() {
            tracing::debug!("Session expired at {}", stored.expires_at);
            cache.remove(SESSION_PREFIX, &token).await?;
            return Ok(Session::new());
        }

        Ok(Session::from_stored(token, stored))
    }

    /// Persist any changes and return the `Set-Cookie` headers for the response.
    ///
    /// Unmodified sessions produce no headers. Calling this twice for one request
    /// writes nothing the second time.
    pub async fn save(&self, session: &Session) -> Result<HeaderMap, SessionError> {
        let mut state = session.lock().await;
        let mut headers = HeaderMap::new();
        let now = Utc::now();

        let mut cache = self.cache.lock().await;

        if let Some(stale) = state.stale_token.take() {
            cache.remove(SESSION_PREFIX, &stale).await?;
        }

        match state.status {
            SessionStatus::Unmodified => {}
            SessionStatus::Destroyed => {
                header_set_cookie(
                    &mut headers,
                    &self.config.cookie_name,
                    "",
                    now - Duration::seconds(86400),
                    -1,
                    self.config.secure,
                )?;
            }
            SessionStatus::Modified => {
                let token = match &state.token {
                    Some(token) => token.clone(),
                    None => {
                        let token = gen_random_string(32)?;
                        state.token = Some(token.clone());
                        state.expires_at = Some(now + self.config.lifetime);
                        token
                    }
                };
                let expires_at = *state.expires_at.get_or_insert(now + self.config.lifetime);
                let ttl = (expires_at - now).num_seconds().max(0);

                let stored = StoredSession {
                    values: state.values.clone(),
                    expires_at,
                };
                let data: CacheData = stored.try_into()?;
                cache
                    .put_with_ttl(SESSION_PREFIX, &token, data, ttl as usize)
                    .await?;

                header_set_cookie(
                    &mut headers,
                    &self.config.cookie_name,
                    &sign_token(&self.config.secret, &token)?,
                    expires_at,
                    ttl,
                    self.config.secure,
                )?;
            }
        }

        state.status = SessionStatus::Unmodified;
        Ok(headers)
    }
}
