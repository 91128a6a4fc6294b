//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body could not be parsed, e.g. malformed JSON, a missing
    /// field, a field of the wrong type or an unknown transaction type.
    ///
    /// Callers should pass in the parser's message so the client can see
    /// which part of the body was rejected.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// An empty (or whitespace only) string was used as a transaction title.
    #[error("transaction title cannot be empty")]
    EmptyTitle,

    /// A negative, non-finite or too large number was given as a transaction amount.
    ///
    /// The transaction type decides the sign of the stored amount, so the
    /// client must always send the magnitude.
    #[error(
        "{0} is not a valid amount, amounts must be non-negative numbers no greater than {max}",
        max = crate::transaction::MAX_AMOUNT
    )]
    InvalidAmount(f64),

    /// The transaction ID in the request path is not a valid UUID.
    #[error("\"{0}\" is not a valid transaction ID")]
    InvalidTransactionId(String),

    /// The session cookie is missing from the request or does not hold a
    /// valid session ID.
    #[error("no session cookie in the cookie jar :(")]
    MissingSession,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRequestBody(_)
            | Error::EmptyTitle
            | Error::InvalidAmount(_)
            | Error::InvalidTransactionId(_) => StatusCode::BAD_REQUEST,
            Error::MissingSession => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            Error::MissingSession => "Unauthorized.".to_owned(),
            // Storage errors are not intended to be shown to the client.
            Error::SqlError(_) | Error::DatabaseLockError => {
                tracing::error!("An unexpected error occurred: {}", self);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
