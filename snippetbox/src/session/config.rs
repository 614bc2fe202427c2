use std::env;

use chrono::{Duration, Utc};

const DEFAULT_SESSION_SECRET: &str = "default_secret_key_change_in_production";

/// Settings for the session and CSRF cookies.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub csrf_cookie_name: String,
    /// Absolute lifetime of a session, counted from its creation.
    pub lifetime: Duration,
    /// Restrict both cookies to HTTPS.
    pub secure: bool,
    /// Key for signing session tokens.
    pub secret: Vec<u8>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            csrf_cookie_name: "csrf_token".to_string(),
            lifetime: Duration::hours(12),
            secure: true,
            secret: DEFAULT_SESSION_SECRET.as_bytes().to_vec(),
        }
    }
}

impl SessionConfig {
    /// Build the configuration from `SESSION_*` and `CSRF_COOKIE_NAME` environment variables,
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let secret = match lookup("SESSION_SECRET") {
            Some(secret) if !secret.is_empty() => secret.into_bytes(),
            _ => {
                tracing::warn!("SESSION_SECRET is not set, using the development default");
                defaults.secret
            }
        };

        Self {
            cookie_name: lookup("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            csrf_cookie_name: lookup("CSRF_COOKIE_NAME").unwrap_or(defaults.csrf_cookie_name),
            lifetime: lookup("SESSION_LIFETIME_SECS")
                .and_then(|s| parse_lifetime(&s))
                .unwrap_or(defaults.lifetime),
            secure: lookup("SESSION_SECURE")
                .map(|val| val.to_lowercase() != "false")
                .unwrap_or(defaults.secure),
            secret,
        }
    }
}

/// A positive number of seconds that still yields a representable expiry time.
fn parse_lifetime(secs: &str) -> Option<Duration> {
    let secs: i64 = secs.trim().parse().ok()?;
    if secs <= 0 {
        tracing::warn!("Ignoring non-positive SESSION_LIFETIME_SECS {}", secs);
        return None;
    }
    let lifetime = Duration::try_seconds(secs)?;
    Utc::now().checked_add_signed(lifetime)?;
    Some(lifetime)
}
