//! Per-request values placed in the request extensions by the dynamic chain
//!
//! Extensions are keyed by type, so each value gets its own newtype here.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::request::Parts;

use snippetbox::Session;

use crate::error::AppError;

/// Whether this request belongs to a signed-in, active user.
///
/// Computed by the `authenticate` stage on every request and never stored in the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IsAuthenticated(pub bool);

/// Request-scoped view of the session and sign-in state.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub session: Option<Session>,
    pub is_authenticated: bool,
}

impl RequestContext {
    /// The loaded session. Missing only when a handler is mounted without the dynamic chain.
    #[track_caller]
    pub fn session(&self) -> Result<&Session, AppError> {
        match &self.session {
            Some(session) => Ok(session),
            None => Err(AppError::server("route is not behind the session stage")),
        }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            session: parts.extensions.get::<Session>().cloned(),
            is_authenticated: parts
                .extensions
                .get::<IsAuthenticated>()
                .copied()
                .unwrap_or_default()
                .0,
        })
    }
}
