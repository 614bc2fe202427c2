//! Middleware stages of the standard and dynamic chains

use std::any::Any;
use std::backtrace::Backtrace;
use std::net::SocketAddr;

use axum::{
    body::{Body, to_bytes},
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use http::{
    HeaderMap, HeaderValue, StatusCode,
    header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE, X_FRAME_OPTIONS, X_XSS_PROTECTION},
};

use snippetbox::{
    CSRF_FORM_FIELD, CSRF_HEADER, Session, csrf_cookie_headers, current_csrf_token,
    ensure_csrf_token, get_cookie_value, is_state_changing, resolve_authentication,
    verify_csrf_token,
};

use crate::context::IsAuthenticated;
use crate::error::{AppError, IntoResponseError};
use crate::state::AppState;

/// Largest form body buffered while looking for the CSRF field.
const MAX_FORM_BYTES: usize = 1024 * 1024;

/// Path unauthenticated visitors are sent to by [`require_authentication`].
pub(crate) const LOGIN_PATH: &str = "/user/login";

/// Turn a panic anywhere below the standard chain into a generic 500.
///
/// The panic payload is logged and never sent to the client.
pub(crate) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(
        "Recovered from panic: {}\n{}",
        detail,
        Backtrace::force_capture()
    );

    let mut response = AppError::ServerError(detail.to_string()).into_response();
    response
        .headers_mut()
        .insert(CONNECTION, HeaderValue::from_static("close"));
    apply_security_headers(response.headers_mut());
    response
}

pub(crate) async fn log_request(req: Request, next: Next) -> Response {
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info!(
        "{} - {:?} {} {}",
        remote,
        req.version(),
        req.method(),
        req.uri()
    );
    next.run(req).await
}

pub(crate) async fn secure_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    apply_security_headers(response.headers_mut());
    response
}

fn apply_security_headers(headers: &mut HeaderMap) {
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("deny"));
}

/// Load the session before the rest of the chain and save it once afterwards.
pub(crate) async fn load_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = state
        .sessions
        .load(req.headers())
        .await
        .into_response_error()?;
    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;

    let cookies = state.sessions.save(&session).await.into_response_error()?;
    append_headers(response.headers_mut(), cookies);
    Ok(response)
}

/// Issue the CSRF token on safe requests and check it on state-changing ones.
pub(crate) async fn csrf_protect(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = loaded_session(&req)?;
    let config = state.sessions.config();
    let cookie_token = get_cookie_value(req.headers(), &config.csrf_cookie_name);

    let req = if is_state_changing(req.method()) {
        let method = req.method().clone();
        let uri = req.uri().clone();
        let (req, submitted) = submitted_csrf_token(req).await?;

        if let Err(e) =
            verify_csrf_token(&session, cookie_token.as_deref(), submitted.as_deref()).await
        {
            tracing::warn!("Rejected {} {}: {}", method, uri, e);
            return Err(AppError::ClientError(StatusCode::BAD_REQUEST));
        }
        req
    } else {
        ensure_csrf_token(&session).await.into_response_error()?;
        req
    };

    let mut response = next.run(req).await;

    // Mirror the session's token into the CSRF cookie whenever they differ
    if let Some(token) = current_csrf_token(&session).await {
        if cookie_token.as_deref() != Some(token.as_str()) {
            let headers = csrf_cookie_headers(config, &token).into_response_error()?;
            append_headers(response.headers_mut(), headers);
        }
    }
    Ok(response)
}

/// Token from the `X-CSRF-Token` header, or else from the urlencoded form body.
///
/// The body is buffered and put back so the handler still sees it.
async fn submitted_csrf_token(req: Request) -> Result<(Request, Option<String>), AppError> {
    let from_header = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if from_header.is_some() {
        return Ok((req, from_header));
    }

    let is_form = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    if !is_form {
        return Ok((req, None));
    }

    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, MAX_FORM_BYTES).await.map_err(|e| {
        tracing::debug!("Failed to read form body: {}", e);
        AppError::ClientError(StatusCode::BAD_REQUEST)
    })?;

    let token = url::form_urlencoded::parse(&bytes)
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value.into_owned());

    Ok((Request::from_parts(parts, Body::from(bytes)), token))
}

/// Decide sign-in state for this request from the session and the user store.
pub(crate) async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = loaded_session(&req)?;

    let is_authenticated = resolve_authentication(&session, state.users.as_ref())
        .await
        .into_response_error()?;
    req.extensions_mut()
        .insert(IsAuthenticated(is_authenticated));

    Ok(next.run(req).await)
}

/// Authorization gate: redirect visitors who are not signed in to the login page.
pub(crate) async fn require_authentication(req: Request, next: Next) -> Response {
    let IsAuthenticated(signed_in) = req
        .extensions()
        .get::<IsAuthenticated>()
        .copied()
        .unwrap_or_default();

    if !signed_in {
        tracing::debug!("Not signed in, redirecting {} to {}", req.uri(), LOGIN_PATH);
        return Redirect::to(LOGIN_PATH).into_response();
    }

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .append(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

#[track_caller]
fn loaded_session(req: &Request) -> Result<Session, AppError> {
    match req.extensions().get::<Session>() {
        Some(session) => Ok(session.clone()),
        None => Err(AppError::server("session stage must run first")),
    }
}

/// Append every header of `source`, keeping repeated `Set-Cookie` values.
fn append_headers(target: &mut HeaderMap, source: HeaderMap) {
    for (name, value) in source.iter() {
        target.append(name, value.clone());
    }
}
