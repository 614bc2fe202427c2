mod config;
mod csrf;
mod errors;
mod handle;
mod store;
mod token;
mod types;

pub use config::SessionConfig;
pub use csrf::{
    CSRF_FORM_FIELD, CSRF_HEADER, CsrfToken, csrf_cookie_headers, current_csrf_token,
    ensure_csrf_token, is_state_changing, verify_csrf_token,
};
pub use errors::SessionError;
pub use handle::Session;
pub use store::SessionStore;

/// Session key holding the one-time flash message.
pub const FLASH_KEY: &str = "flash";
