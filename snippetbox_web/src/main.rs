use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tower_http::timeout::TimeoutLayer;

use snippetbox::{
    InMemorySnippetStore, InMemoryUserStore, SessionConfig, SessionStore, SnippetStore,
    SqliteSnippetStore, SqliteUserStore, UserStore, connect_sqlite,
};
use snippetbox_axum::{AppState, PAGES, TemplateCache, router};

mod config;
mod server;

use crate::{
    config::{Database, ServerConfig},
    server::{init_tracing, spawn_http_server, spawn_https_server},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

type Stores = (Arc<dyn UserStore>, Arc<dyn SnippetStore>);

async fn open_stores(database: &Database) -> Result<Stores, Box<dyn Error>> {
    match database {
        Database::Memory => {
            tracing::warn!("Using in-memory stores, data is lost on exit");
            Ok((
                Arc::new(InMemoryUserStore::new()),
                Arc::new(InMemorySnippetStore::new()),
            ))
        }
        Database::Sqlite(url) => {
            let pool = connect_sqlite(url).await?;
            let users = SqliteUserStore::new(pool.clone()).await?;
            let snippets = SqliteSnippetStore::new(pool).await?;
            Ok((Arc::new(users), Arc::new(snippets)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // rustls needs a process-level CryptoProvider before any TLS config is built
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install default CryptoProvider");

    dotenvy::dotenv().ok();
    init_tracing(env!("CARGO_CRATE_NAME"));

    let config = ServerConfig::from_env()?;
    let (users, snippets) = open_stores(&config.database).await?;

    let templates = TemplateCache::new();
    templates.ensure_pages(&PAGES)?;

    let session_config = SessionConfig::from_env();
    if config.drops_secure_cookies(&session_config) {
        tracing::warn!(
            "SESSION_SECURE is on but no TLS_CERT_PATH/TLS_KEY_PATH is set; browsers will not \
             return the session and CSRF cookies over plain HTTP. Set SESSION_SECURE=false for local HTTP."
        );
    }
    let sessions = SessionStore::in_memory(session_config);
    let state = AppState::new(sessions, users, snippets, templates);
    let app = router(state).layer(TimeoutLayer::new(REQUEST_TIMEOUT));

    let server = match &config.tls {
        Some(tls) => spawn_https_server(config.addr, tls, app).await?,
        None => spawn_http_server(config.addr, app),
    };

    server.await??;
    Ok(())
}
