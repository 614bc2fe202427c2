//! Session-backed sign-in state
//!
//! The session only ever stores the user id. Whether that id still belongs to
//! an active account is decided again on every request by [`resolve_authentication`].

use crate::session::Session;
use crate::userdb::{UserError, UserStore};

/// Session key holding the signed-in user's id.
pub const AUTHENTICATED_USER_ID_KEY: &str = "authenticatedUserID";

/// Decide whether the session belongs to a signed-in, active user.
///
/// A stored id that no longer resolves to an active account is removed from
/// the session and reported as signed out. Only storage failures are errors.
pub async fn resolve_authentication(
    session: &Session,
    users: &dyn UserStore,
) -> Result<bool, UserError> {
    if !session.exists(AUTHENTICATED_USER_ID_KEY).await {
        return Ok(false);
    }

    let Some(id) = session.get_int(AUTHENTICATED_USER_ID_KEY).await else {
        tracing::warn!("Dropping non-integer {}", AUTHENTICATED_USER_ID_KEY);
        session.remove(AUTHENTICATED_USER_ID_KEY).await;
        return Ok(false);
    };

    match users.get(id).await {
        Ok(user) if user.active => Ok(true),
        Ok(_) => {
            tracing::info!("User {} is inactive, signing out", id);
            session.remove(AUTHENTICATED_USER_ID_KEY).await;
            Ok(false)
        }
        Err(UserError::NoRecord) => {
            tracing::info!("User {} no longer exists, signing out", id);
            session.remove(AUTHENTICATED_USER_ID_KEY).await;
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Record a successful login. The session token is renewed first.
pub async fn sign_in(session: &Session, user_id: i64) {
    session.renew_token().await;
    session.put(AUTHENTICATED_USER_ID_KEY, user_id).await;
}

/// Forget the signed-in user and renew the session token.
pub async fn sign_out(session: &Session) {
    session.remove(AUTHENTICATED_USER_ID_KEY).await;
    session.renew_token().await;
}
