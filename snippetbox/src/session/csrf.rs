use chrono::Utc;
use http::{HeaderMap, Method};
use subtle::ConstantTimeEq;

use crate::utils::{gen_random_string, header_set_cookie};

use super::config::SessionConfig;
use super::errors::SessionError;
use super::handle::Session;

/// Reserved session key holding the CSRF token.
pub(super) const CSRF_SESSION_KEY: &str = "__csrf_token";

/// Name of the hidden form field carrying the token.
pub const CSRF_FORM_FIELD: &str = "csrf_token";

/// Request header accepted as an alternative to the form field.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// The session's CSRF token, as handed to templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Methods that must carry a valid CSRF token.
pub fn is_state_changing(method: &Method) -> bool {
    method == Method::POST
        || method == Method::PUT
        || method == Method::PATCH
        || method == Method::DELETE
}

pub async fn current_csrf_token(session: &Session) -> Option<CsrfToken> {
    session
        .get_string(CSRF_SESSION_KEY)
        .await
        .map(CsrfToken::new)
}

/// Return the session's token, issuing a new one if the session has none yet.
pub async fn ensure_csrf_token(session: &Session) -> Result<CsrfToken, SessionError> {
    if let Some(token) = current_csrf_token(session).await {
        return Ok(token);
    }

    let token = gen_random_string(32)?;
    session.put(CSRF_SESSION_KEY, token.clone()).await;
    tracing::debug!("Issued new CSRF token");
    Ok(CsrfToken::new(token))
}

/// Check a state-changing request against the session's token.
///
/// The cookie copy and the submitted value must both equal the token held in the
/// session. Every failure yields the same error so callers cannot tell them apart.
pub async fn verify_csrf_token(
    session: &Session,
    cookie_token: Option<&str>,
    submitted: Option<&str>,
) -> Result<(), SessionError> {
    let rejected = || SessionError::CsrfToken("CSRF token missing or incorrect".to_string());

    let Some(expected) = current_csrf_token(session).await else {
        tracing::debug!("No CSRF token in session");
        return Err(rejected());
    };
    let (Some(cookie_token), Some(submitted)) = (cookie_token, submitted) else {
        tracing::debug!("CSRF token not presented");
        return Err(rejected());
    };

    let expected = expected.as_str().as_bytes();
    let cookie_ok = cookie_token.as_bytes().ct_eq(expected);
    let submitted_ok = submitted.as_bytes().ct_eq(expected);

    if bool::from(cookie_ok & submitted_ok) {
        Ok(())
    } else {
        tracing::debug!("CSRF token mismatch");
        Err(rejected())
    }
}

/// `Set-Cookie` headers mirroring the token into the CSRF cookie.
pub fn csrf_cookie_headers(
    config: &SessionConfig,
    token: &CsrfToken,
) -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        &config.csrf_cookie_name,
        token.as_str(),
        Utc::now() + config.lifetime,
        config.lifetime.num_seconds(),
        config.secure,
    )?;
    Ok(headers)
}
