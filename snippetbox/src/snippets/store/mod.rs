mod memory;
mod sqlite;

use async_trait::async_trait;

use super::errors::SnippetError;
use super::types::Snippet;

pub use memory::InMemorySnippetStore;
pub use sqlite::SqliteSnippetStore;

/// Number of snippets shown on the home page.
pub(super) const LATEST_LIMIT: usize = 10;

#[async_trait]
pub trait SnippetStore: Send + Sync + 'static {
    /// Store a snippet that expires `expires_days` from now and return its id.
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: i64,
    ) -> Result<i64, SnippetError>;

    /// Fetch an unexpired snippet; expired or unknown ids are [`SnippetError::NoRecord`].
    async fn get(&self, id: i64) -> Result<Snippet, SnippetError>;

    /// The most recently created unexpired snippets, newest first.
    async fn latest(&self) -> Result<Vec<Snippet>, SnippetError>;
}
