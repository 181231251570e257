//! HTTP error mapping.
//!
//! Every failure leaves the API as `{ "error": <message>, "code": <CODE> }`.
//! Internal details are logged and replaced by a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use caretrack_core::error::CoreError;
use serde::Serialize;

/// Error type returned by handlers and the engine.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A request body failed its `validator` rules.
    #[error("{0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

struct Mapped {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Mapped {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl AppError {
    fn mapped(&self) -> Mapped {
        match self {
            AppError::Core(err) => map_core(err),
            AppError::Database(err) => map_sqlx(err),
            AppError::InvalidInput(errors) => {
                Mapped::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", errors.to_string())
            }
            AppError::BadRequest(msg) => Mapped::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Mapped::internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Mapped {
            status,
            code,
            message,
        } = self.mapped();
        if status.is_client_error() {
            tracing::debug!(status = status.as_u16(), code, %message, "Request rejected");
        }
        (status, Json(ErrorBody { error: message, code })).into_response()
    }
}

fn map_core(err: &CoreError) -> Mapped {
    match err {
        CoreError::NotFound { entity, id } => Mapped::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => Mapped::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
        CoreError::Conflict(msg) => Mapped::new(StatusCode::CONFLICT, "CONFLICT", msg),
        CoreError::Unauthorized(msg) => Mapped::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
        CoreError::Forbidden(msg) => Mapped::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            Mapped::internal()
        }
    }
}

/// `RowNotFound` is 404 and `uq_*` unique violations are 409 (Postgres
/// code 23505). Anything else is logged and reported as 500.
fn map_sqlx(err: &sqlx::Error) -> Mapped {
    if let sqlx::Error::RowNotFound = err {
        return Mapped::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found");
    }
    if let Some(db_err) = err.as_database_error() {
        let unique = db_err.code().as_deref() == Some("23505");
        if let Some(constraint) = db_err.constraint().filter(|c| unique && c.starts_with("uq_")) {
            return Mapped::new(
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            );
        }
    }
    tracing::error!(error = %err, "Database error");
    Mapped::internal()
}
