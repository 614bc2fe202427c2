use std::net::SocketAddr;
use std::sync::Arc;

use snippetbox::{InMemorySnippetStore, InMemoryUserStore, SessionConfig, SessionStore};
use snippetbox_axum::{AppState, TemplateCache, router};
use tokio::task::JoinHandle;

/// The application served over plain HTTP on 127.0.0.1 with in-memory stores.
pub struct TestServer {
    server_handle: JoinHandle<()>,
    pub base_url: String,
    /// Kept so tests can change accounts behind the application's back.
    pub users: Arc<InMemoryUserStore>,
}

impl TestServer {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let users = Arc::new(InMemoryUserStore::new());
        let state = AppState::new(
            SessionStore::in_memory(SessionConfig {
                secure: false,
                ..SessionConfig::default()
            }),
            users.clone(),
            Arc::new(InMemorySnippetStore::new()),
            TemplateCache::new(),
        );
        let app = router(state);

        let server_handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Ok(Self {
            server_handle,
            base_url: format!("http://{addr}"),
            users,
        })
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}
