use thiserror::Error;

#[derive(Clone, Error, Debug, PartialEq)]
pub enum UserError {
    #[error("No matching user record found")]
    NoRecord,

    #[error("Existing user with that email")]
    DuplicateEmail,

    #[error("Invalid user credentials")]
    InvalidCredentials,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => UserError::NoRecord,
            sqlx::Error::Database(db) if db.is_unique_violation() => UserError::DuplicateEmail,
            other => UserError::Storage(other.to_string()),
        }
    }
}
