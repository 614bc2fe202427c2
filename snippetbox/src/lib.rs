//! snippetbox - request pipeline core for the snippetbox web application
//!
//! Framework-agnostic pieces shared by the web integration: server-side
//! sessions behind a signed cookie, CSRF tokens, sign-in state, and the user
//! and snippet collaborators the handlers call into.

mod auth;
mod forms;
mod session;
mod snippets;
mod storage;
mod userdb;
mod utils;

pub use auth::{AUTHENTICATED_USER_ID_KEY, resolve_authentication, sign_in, sign_out};

pub use forms::{EMAIL_RX, Form, FormErrors};

pub use session::{
    CSRF_FORM_FIELD, CSRF_HEADER, CsrfToken, FLASH_KEY, Session, SessionConfig, SessionError,
    SessionStore, csrf_cookie_headers, current_csrf_token, ensure_csrf_token, is_state_changing,
    verify_csrf_token,
};

pub use snippets::{InMemorySnippetStore, Snippet, SnippetError, SnippetStore, SqliteSnippetStore};

pub use storage::{CacheData, CacheStore, InMemoryCacheStore, StorageError, connect_sqlite};

pub use userdb::{InMemoryUserStore, SqliteUserStore, User, UserError, UserStore};

pub use utils::{UtilError, get_cookie_value};
