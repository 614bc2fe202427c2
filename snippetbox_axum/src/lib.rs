//! snippetbox-axum - Axum integration for the snippetbox request pipeline
//!
//! Builds the application router: the standard and dynamic middleware chains,
//! the authorization gate, page handlers, and the render pipeline that merges
//! per-request defaults into every page.

mod context;
mod error;
mod handlers;
mod middleware;
mod render;
mod router;
mod state;
mod static_files;
mod templates;

pub use context::{IsAuthenticated, RequestContext};
pub use error::{AppError, IntoResponseError};
pub use router::router;
pub use state::AppState;
pub use templates::{
    CREATE_PAGE, HOME_PAGE, LOGIN_PAGE, PAGES, PageRenderer, SHOW_PAGE, SIGNUP_PAGE, SnippetView,
    TemplateCache, TemplateData, TemplateError, human_date,
};
