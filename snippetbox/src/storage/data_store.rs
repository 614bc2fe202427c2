//! SQLite connection pool shared by the user and snippet stores

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::errors::StorageError;

/// Open (creating if missing) the SQLite database at `url`.
pub async fn connect_sqlite(url: &str) -> Result<SqlitePool, StorageError> {
    tracing::info!("Connecting to SQLite data store: {}", url);

    let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    // Each connection to an in-memory database sees its own empty database
    let pool = if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
    .connect_with(opts)
    .await?;

    tracing::info!("Connected to SQLite data store: {}", url);
    Ok(pool)
}
