use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use super::{LATEST_LIMIT, SnippetStore};
use crate::snippets::errors::SnippetError;
use crate::snippets::types::Snippet;

#[derive(Default)]
pub struct InMemorySnippetStore {
    snippets: Mutex<Vec<Snippet>>,
}

impl InMemorySnippetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with fixed records. New inserts continue after the highest id.
    pub fn with_snippets(snippets: Vec<Snippet>) -> Self {
        Self {
            snippets: Mutex::new(snippets),
        }
    }
}

#[async_trait]
impl SnippetStore for InMemorySnippetStore {
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: i64,
    ) -> Result<i64, SnippetError> {
        let mut snippets = self.snippets.lock().await;
        let id = snippets.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let created = Utc::now();

        snippets.push(Snippet {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created,
            expires: created + Duration::days(expires_days),
        });
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Snippet, SnippetError> {
        let snippets = self.snippets.lock().await;
        snippets
            .iter()
            .find(|s| s.id == id && !s.is_expired())
            .cloned()
            .ok_or(SnippetError::NoRecord)
    }

    async fn latest(&self) -> Result<Vec<Snippet>, SnippetError> {
        let snippets = self.snippets.lock().await;
        let mut live: Vec<Snippet> = snippets
            .iter()
            .filter(|s| !s.is_expired())
            .cloned()
            .collect();
        live.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        live.truncate(LATEST_LIMIT);
        Ok(live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(id: i64, created_mins_ago: i64, expires_in_days: i64) -> Snippet {
        let created = Utc::now() - Duration::minutes(created_mins_ago);
        Snippet {
            id,
            title: format!("Snippet {id}"),
            content: "content".to_string(),
            created,
            expires: Utc::now() + Duration::days(expires_in_days),
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = InMemorySnippetStore::new();
        let id = store.insert("An old silent pond", "A frog jumps in", 7).await.unwrap();

        let s = store.get(id).await.unwrap();
        assert_eq!(s.title, "An old silent pond");
        assert_eq!((s.expires - s.created).num_days(), 7);
    }

    #[tokio::test]
    async fn test_expired_snippet_is_no_record() {
        let store = InMemorySnippetStore::with_snippets(vec![snippet(1, 10, -1)]);
        assert_eq!(store.get(1).await, Err(SnippetError::NoRecord));
        assert_eq!(store.get(2).await, Err(SnippetError::NoRecord));
    }

    #[tokio::test]
    async fn test_latest_is_newest_first_and_capped() {
        let seeded = (1..=12).map(|id| snippet(id, 100 - id, 1)).collect();
        let store = InMemorySnippetStore::with_snippets(seeded);

        let latest = store.latest().await.unwrap();
        assert_eq!(latest.len(), LATEST_LIMIT);
        assert_eq!(latest[0].id, 12);
        assert_eq!(latest[9].id, 3);
    }

    #[tokio::test]
    async fn test_latest_skips_expired_and_ids_continue() {
        let store = InMemorySnippetStore::with_snippets(vec![snippet(1, 5, 1), snippet(4, 1, -1)]);

        let latest = store.latest().await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id, 1);

        assert_eq!(store.insert("t", "c", 1).await.unwrap(), 5);
    }
}
