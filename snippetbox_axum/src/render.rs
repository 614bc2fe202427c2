use axum::response::{Html, IntoResponse, Response};
use chrono::{Datelike, Utc};

use snippetbox::{FLASH_KEY, ensure_csrf_token};

use crate::context::RequestContext;
use crate::error::{AppError, IntoResponseError};
use crate::state::AppState;
use crate::templates::TemplateData;

/// Render `page` with `data` merged with the per-request defaults.
///
/// The page is rendered into a buffer first; a failing template yields a 500 and
/// none of the partial output.
pub(crate) async fn render(
    state: &AppState,
    ctx: &RequestContext,
    page: &str,
    data: Option<TemplateData>,
) -> Result<Response, AppError> {
    let Some(renderer) = state.templates.get(page) else {
        return Err(AppError::server(format!(
            "The template {page} does not exist"
        )));
    };

    let data = add_default_data(ctx, data).await?;

    let mut buf = String::new();
    renderer(&data, &mut buf).into_response_error()?;

    Ok(Html(buf).into_response())
}

async fn add_default_data(
    ctx: &RequestContext,
    data: Option<TemplateData>,
) -> Result<TemplateData, AppError> {
    let mut data = data.unwrap_or_default();

    data.current_year = Utc::now().year();
    data.is_authenticated = ctx.is_authenticated;

    if let Some(session) = &ctx.session {
        // Popped before rendering: a failed render drops the flash rather than repeat it
        data.flash = session.pop_string(FLASH_KEY).await;
        data.csrf_token = ensure_csrf_token(session)
            .await
            .into_response_error()?
            .into_inner();
    }

    Ok(data)
}
