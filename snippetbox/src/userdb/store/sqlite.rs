use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::UserStore;
use crate::userdb::errors::UserError;
use crate::userdb::password::{hash_password, verify_password};
use crate::userdb::types::User;

pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Wrap the pool and create the `users` table if missing.
    pub async fn new(pool: SqlitePool) -> Result<Self, UserError> {
        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    async fn create_tables(&self) -> Result<(), UserError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                hashed_password TEXT NOT NULL,
                created TIMESTAMP NOT NULL,
                active BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<i64, UserError> {
        let hashed_password =
            hash_password(password).map_err(|e| UserError::Storage(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, hashed_password, created, active)
            VALUES (?, ?, ?, ?, TRUE)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    #[tracing::instrument(skip(self, password))]
    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, UserError> {
        let row: Option<(i64, String)> = sqlx::query_as(
            r#"
            SELECT id, hashed_password FROM users WHERE email = ? AND active = TRUE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((id, hashed)) if verify_password(password, &hashed) => Ok(id),
            _ => Err(UserError::InvalidCredentials),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<User, UserError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, hashed_password, created, active FROM users WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(UserError::NoRecord)
    }
}
