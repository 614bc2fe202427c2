//! Signed session tokens
//!
//! The cookie carries `<token>.<signature>` where the signature is an
//! HMAC-SHA256 of the token under the server secret. A cookie whose
//! signature does not verify is treated as if no cookie was sent.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::session::errors::SessionError;
use crate::utils::{base64url_decode, base64url_encode};

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &[u8], token: &str) -> Result<HmacSha256, SessionError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SessionError::Crypto(format!("Invalid HMAC key: {e}")))?;
    mac.update(token.as_bytes());
    Ok(mac)
}

pub(super) fn sign_token(secret: &[u8], token: &str) -> Result<String, SessionError> {
    let signature = mac_for(secret, token)?.finalize().into_bytes();
    Ok(format!("{token}.{}", base64url_encode(&signature)))
}

/// Returns the bare token if the signature verifies.
pub(super) fn verify_signed_token(secret: &[u8], signed: &str) -> Option<String> {
    let (token, signature) = signed.rsplit_once('.')?;
    let signature = base64url_decode(signature).ok()?;

    match mac_for(secret, token).ok()?.verify_slice(&signature) {
        Ok(()) => Some(token.to_string()),
        Err(_) => {
            tracing::debug!("Session token signature mismatch");
            None
        }
    }
}
