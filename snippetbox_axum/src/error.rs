use std::backtrace::Backtrace;
use std::fmt::Display;
use std::panic::Location;

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use snippetbox::{SessionError, SnippetError, UserError};

/// Failure of a request stage, mapped to a generic status-text response.
#[derive(Debug)]
pub enum AppError {
    ClientError(StatusCode),
    NotFound,
    /// Already logged where it was raised; the message never reaches the client.
    ServerError(String),
}

impl AppError {
    /// Log `err` with a backtrace, attributed to the caller, and return a server error.
    #[track_caller]
    pub fn server(err: impl Display) -> Self {
        let location = Location::caller();
        tracing::error!(
            "{}:{}: {}\n{}",
            location.file(),
            location.line(),
            err,
            Backtrace::force_capture()
        );
        Self::ServerError(err.to_string())
    }
}

/// Status line text used as the body of error responses.
pub(crate) fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Error")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::ClientError(status) => status,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, status_text(status)).into_response()
    }
}

/// Helper trait for converting collaborator errors into an [`AppError`]
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, AppError>;
}

impl<T> IntoResponseError<T> for Result<T, SnippetError> {
    #[track_caller]
    fn into_response_error(self) -> Result<T, AppError> {
        match self {
            Ok(value) => Ok(value),
            Err(SnippetError::NoRecord) => Err(AppError::NotFound),
            Err(e) => Err(AppError::server(e)),
        }
    }
}

impl<T> IntoResponseError<T> for Result<T, UserError> {
    #[track_caller]
    fn into_response_error(self) -> Result<T, AppError> {
        match self {
            Ok(value) => Ok(value),
            Err(UserError::NoRecord) => Err(AppError::NotFound),
            Err(e) => Err(AppError::server(e)),
        }
    }
}

impl<T> IntoResponseError<T> for Result<T, SessionError> {
    #[track_caller]
    fn into_response_error(self) -> Result<T, AppError> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(AppError::server(e)),
        }
    }
}

impl<T> IntoResponseError<T> for Result<T, http::Error> {
    #[track_caller]
    fn into_response_error(self) -> Result<T, AppError> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(AppError::server(e)),
        }
    }
}

impl<T> IntoResponseError<T> for Result<T, askama::Error> {
    #[track_caller]
    fn into_response_error(self) -> Result<T, AppError> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(AppError::server(e)),
        }
    }
}
