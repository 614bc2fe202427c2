use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handlers::{
    create_snippet, create_snippet_form, home, login, login_form, logout, not_found, ping,
    show_snippet, signup, signup_form,
};
use crate::middleware::{
    authenticate, csrf_protect, handle_panic, load_session, log_request, require_authentication,
    secure_headers,
};
use crate::state::AppState;
use crate::static_files;

/// The application's route table wrapped in its middleware chains.
///
/// Standard chain on every request, outermost first: panic recovery, request
/// logging, security headers. Application pages additionally run the dynamic
/// chain: session load/save, CSRF protection, authentication. Pages that
/// need a signed-in user also pass the authorization gate.
pub fn router(state: AppState) -> Router {
    let dynamic = ServiceBuilder::new()
        .layer(from_fn_with_state(state.clone(), load_session))
        .layer(from_fn_with_state(state.clone(), csrf_protect))
        .layer(from_fn_with_state(state.clone(), authenticate));

    let pages = Router::new()
        .route("/", get(home))
        .route(
            "/snippet/create",
            get(create_snippet_form)
                .post(create_snippet)
                .route_layer(from_fn(require_authentication)),
        )
        .route("/snippet/{id}", get(show_snippet))
        .route("/user/signup", get(signup_form).post(signup))
        .route("/user/login", get(login_form).post(login))
        .route(
            "/user/logout",
            post(logout).route_layer(from_fn(require_authentication)),
        )
        .route_layer(dynamic);

    let standard = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn(log_request))
        .layer(from_fn(secure_headers));

    Router::new()
        .merge(pages)
        .route("/ping", get(ping))
        .nest("/static", static_files::router())
        .fallback(not_found)
        .layer(standard)
        .with_state(state)
}
