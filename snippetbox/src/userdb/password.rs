//! PBKDF2-HMAC-SHA256 password hashes stored as `<salt>$<hash>` (base64url).

use std::num::NonZeroU32;

use ring::pbkdf2;

use crate::utils::{UtilError, base64url_decode, base64url_encode, gen_random_bytes};

static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;
const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

fn iterations() -> NonZeroU32 {
    NonZeroU32::new(ITERATIONS).unwrap_or(NonZeroU32::MIN)
}

pub(super) fn hash_password(password: &str) -> Result<String, UtilError> {
    let salt = gen_random_bytes(SALT_LEN)?;
    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(ALGORITHM, iterations(), &salt, password.as_bytes(), &mut hash);

    Ok(format!(
        "{}${}",
        base64url_encode(&salt),
        base64url_encode(&hash)
    ))
}

/// Malformed stored hashes never verify.
pub(super) fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, hash)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (base64url_decode(salt), base64url_decode(hash)) else {
        return false;
    };

    pbkdf2::verify(ALGORITHM, iterations(), &salt, password.as_bytes(), &hash).is_ok()
}
