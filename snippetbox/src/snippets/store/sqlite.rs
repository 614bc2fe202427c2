use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use super::{LATEST_LIMIT, SnippetStore};
use crate::snippets::errors::SnippetError;
use crate::snippets::types::Snippet;

pub struct SqliteSnippetStore {
    pool: SqlitePool,
}

impl SqliteSnippetStore {
    /// Wrap the pool and create the `snippets` table if missing.
    pub async fn new(pool: SqlitePool) -> Result<Self, SnippetError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS snippets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created TIMESTAMP NOT NULL,
                expires TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_snippets_created ON snippets(created)")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SnippetStore for SqliteSnippetStore {
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: i64,
    ) -> Result<i64, SnippetError> {
        let created = Utc::now();
        let expires = created + Duration::days(expires_days);

        let result = sqlx::query(
            r#"
            INSERT INTO snippets (title, content, created, expires)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(created)
        .bind(expires)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<Snippet, SnippetError> {
        sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires FROM snippets
            WHERE expires > ? AND id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(SnippetError::NoRecord)
    }

    #[tracing::instrument(skip(self))]
    async fn latest(&self) -> Result<Vec<Snippet>, SnippetError> {
        let snippets = sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires FROM snippets
            WHERE expires > ? ORDER BY created DESC, id DESC LIMIT ?
            "#,
        )
        .bind(Utc::now())
        .bind(LATEST_LIMIT as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(snippets)
    }
}
