mod errors;
mod store;
mod types;

pub use errors::SnippetError;
pub use store::{InMemorySnippetStore, SnippetStore, SqliteSnippetStore};
pub use types::Snippet;
