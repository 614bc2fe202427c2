use std::sync::Arc;

use snippetbox::{SessionStore, SnippetStore, UserStore};

use crate::templates::TemplateCache;

/// Everything a middleware stage or handler needs, passed explicitly through the router.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub users: Arc<dyn UserStore>,
    pub snippets: Arc<dyn SnippetStore>,
    pub templates: Arc<TemplateCache>,
}

impl AppState {
    pub fn new(
        sessions: SessionStore,
        users: Arc<dyn UserStore>,
        snippets: Arc<dyn SnippetStore>,
        templates: TemplateCache,
    ) -> Self {
        Self {
            sessions,
            users,
            snippets,
            templates: Arc::new(templates),
        }
    }
}
