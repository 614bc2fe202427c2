use axum::{
    Router,
    response::Response,
    routing::get,
};
use http::{StatusCode, header::CONTENT_TYPE};

use crate::error::{AppError, IntoResponseError};

/// Stylesheet and script bundled into the binary, mounted under `/static`.
pub(crate) fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/css/main.css", get(serve_main_css))
        .route("/js/main.js", get(serve_main_js))
}

async fn serve_main_css() -> Result<Response, AppError> {
    let css_content = include_str!("../static/css/main.css");
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/css")
        .body(css_content.into())
        .into_response_error()
}

async fn serve_main_js() -> Result<Response, AppError> {
    let js_content = include_str!("../static/js/main.js");
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/javascript")
        .body(js_content.into())
        .into_response_error()
}
