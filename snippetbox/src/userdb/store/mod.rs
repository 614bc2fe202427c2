mod memory;
mod sqlite;

use async_trait::async_trait;

use super::errors::UserError;
use super::types::User;

pub use memory::InMemoryUserStore;
pub use sqlite::SqliteUserStore;

/// Account collaborator used by the signup/login handlers and the auth resolver.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Create an active account and return its id.
    ///
    /// Fails with [`UserError::DuplicateEmail`] when the email is already registered.
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<i64, UserError>;

    /// Return the id of the active account matching the credentials.
    ///
    /// Unknown emails, wrong passwords and inactive accounts all fail with
    /// [`UserError::InvalidCredentials`].
    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, UserError>;

    /// Fetch an account by id, active or not.
    async fn get(&self, id: i64) -> Result<User, UserError>;
}
