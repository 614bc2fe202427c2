use std::collections::HashMap;

use axum::{
    extract::{Path, State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use http::StatusCode;

use snippetbox::{EMAIL_RX, FLASH_KEY, Form, UserError, sign_in, sign_out};

use crate::context::RequestContext;
use crate::error::{AppError, IntoResponseError};
use crate::render::render;
use crate::state::AppState;
use crate::templates::{
    CREATE_PAGE, HOME_PAGE, LOGIN_PAGE, SHOW_PAGE, SIGNUP_PAGE, SnippetView, TemplateData,
};

type FormValues = axum::Form<HashMap<String, String>>;

const TITLE_MAX_LEN: usize = 100;
const NAME_MAX_LEN: usize = 255;
const EMAIL_MAX_LEN: usize = 255;
const PASSWORD_MIN_LEN: usize = 10;
const EXPIRY_DAYS: [&str; 3] = ["365", "7", "1"];

/// Unparsable form bodies are a client error.
fn parse_form(form: Result<FormValues, FormRejection>) -> Result<Form, AppError> {
    match form {
        Ok(axum::Form(values)) => Ok(Form::new(values)),
        Err(e) => {
            tracing::debug!("Rejected form body: {}", e);
            Err(AppError::ClientError(StatusCode::BAD_REQUEST))
        }
    }
}

fn with_form(form: Form) -> Option<TemplateData> {
    Some(TemplateData {
        form,
        ..Default::default()
    })
}

pub(crate) async fn ping() -> &'static str {
    "OK"
}

pub(crate) async fn not_found() -> AppError {
    AppError::NotFound
}

pub(crate) async fn home(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, AppError> {
    let snippets = state.snippets.latest().await.into_response_error()?;

    let data = TemplateData {
        snippets: snippets.iter().map(SnippetView::from).collect(),
        ..Default::default()
    };
    render(&state, &ctx, HOME_PAGE, Some(data)).await
}

pub(crate) async fn show_snippet(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = match id.parse::<i64>() {
        Ok(id) if id >= 1 => id,
        _ => return Err(AppError::NotFound),
    };

    let snippet = state.snippets.get(id).await.into_response_error()?;

    let data = TemplateData {
        snippet: Some(SnippetView::from(&snippet)),
        ..Default::default()
    };
    render(&state, &ctx, SHOW_PAGE, Some(data)).await
}

pub(crate) async fn create_snippet_form(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, AppError> {
    render(&state, &ctx, CREATE_PAGE, None).await
}

pub(crate) async fn create_snippet(
    State(state): State<AppState>,
    ctx: RequestContext,
    form: Result<FormValues, FormRejection>,
) -> Result<Response, AppError> {
    let mut form = parse_form(form)?;
    form.required(&["title", "content", "expires"]);
    form.max_length("title", TITLE_MAX_LEN);
    form.permitted_values("expires", &EXPIRY_DAYS);

    if !form.valid() {
        return render(&state, &ctx, CREATE_PAGE, with_form(form)).await;
    }

    let expires_days = form
        .get("expires")
        .parse::<i64>()
        .map_err(|_| AppError::ClientError(StatusCode::BAD_REQUEST))?;

    let id = state
        .snippets
        .insert(form.get("title"), form.get("content"), expires_days)
        .await
        .into_response_error()?;

    ctx.session()?
        .put(FLASH_KEY, "Snippet successfully created!")
        .await;
    Ok(Redirect::to(&format!("/snippet/{id}")).into_response())
}

pub(crate) async fn signup_form(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, AppError> {
    render(&state, &ctx, SIGNUP_PAGE, None).await
}

pub(crate) async fn signup(
    State(state): State<AppState>,
    ctx: RequestContext,
    form: Result<FormValues, FormRejection>,
) -> Result<Response, AppError> {
    let mut form = parse_form(form)?;
    form.required(&["name", "email", "password"]);
    form.max_length("name", NAME_MAX_LEN);
    form.max_length("email", EMAIL_MAX_LEN);
    form.matches_pattern("email", &EMAIL_RX);
    form.min_length("password", PASSWORD_MIN_LEN);

    if !form.valid() {
        return render(&state, &ctx, SIGNUP_PAGE, with_form(form)).await;
    }

    let inserted = state
        .users
        .insert(form.get("name"), form.get("email"), form.get("password"))
        .await;
    match inserted {
        Ok(id) => tracing::info!("Created user {}", id),
        Err(UserError::DuplicateEmail) => {
            form.errors.add("email", "Address is already in use");
            return render(&state, &ctx, SIGNUP_PAGE, with_form(form)).await;
        }
        Err(e) => return Err(AppError::server(e)),
    }

    ctx.session()?
        .put(FLASH_KEY, "Your signup was successful. Please log in.")
        .await;
    Ok(Redirect::to("/user/login").into_response())
}

pub(crate) async fn login_form(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, AppError> {
    render(&state, &ctx, LOGIN_PAGE, None).await
}

pub(crate) async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    form: Result<FormValues, FormRejection>,
) -> Result<Response, AppError> {
    let mut form = parse_form(form)?;

    let authenticated = state
        .users
        .authenticate(form.get("email"), form.get("password"))
        .await;
    let id = match authenticated {
        Ok(id) => id,
        Err(UserError::InvalidCredentials) => {
            form.errors.add("generic", "Email or Password is incorrect");
            return render(&state, &ctx, LOGIN_PAGE, with_form(form)).await;
        }
        Err(e) => return Err(AppError::server(e)),
    };

    sign_in(ctx.session()?, id).await;
    Ok(Redirect::to("/snippet/create").into_response())
}

pub(crate) async fn logout(ctx: RequestContext) -> Result<Response, AppError> {
    let session = ctx.session()?;
    sign_out(session).await;
    session
        .put(FLASH_KEY, "You've been logged out successfully!")
        .await;
    Ok(Redirect::to("/").into_response())
}
