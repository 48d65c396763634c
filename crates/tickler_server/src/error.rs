//! Server errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use miette::Diagnostic;
use thiserror::Error;
use tracing::error;

use tickler_api::{ApiError, ErrorResponse};
use tickler_core::CoreError;
use tickler_db::DbError;

pub type ServerResult<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error, Diagnostic)]
pub enum ServerError {
    #[error("missing required configuration: {name}")]
    #[diagnostic(
        code(tickler_server::missing_config),
        help("set the {name} environment variable")
    )]
    MissingConfig { name: &'static str },

    #[error("invalid value for {name}: {value}")]
    #[diagnostic(code(tickler_server::invalid_config))]
    InvalidConfig { name: &'static str, value: String },

    #[error("authentication failed")]
    #[diagnostic(code(tickler_server::unauthorized))]
    Unauthorized,

    #[error("{entity} {id} not found")]
    #[diagnostic(code(tickler_server::not_found))]
    NotFound { entity: &'static str, id: i64 },

    #[error("username is already taken")]
    #[diagnostic(code(tickler_server::username_taken))]
    UsernameTaken,

    #[error("unknown category: {value}")]
    #[diagnostic(code(tickler_server::unknown_category))]
    UnknownCategory { value: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Db(#[from] DbError),

    #[error("password hashing failed")]
    #[diagnostic(code(tickler_server::password_hash))]
    PasswordHash,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::UsernameTaken => StatusCode::CONFLICT,
            Self::UnknownCategory { .. } | Self::Api(_) => StatusCode::BAD_REQUEST,
            Self::Core(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Db(DbError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Db(DbError::AlreadyExists { .. }) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = match &self {
            Self::Api(ApiError::Validation { messages }) => ErrorResponse::new(messages.clone()),
            // Internal detail stays in the log.
            _ if status.is_server_error() => ErrorResponse::single("internal server error"),
            other => ErrorResponse::single(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
