use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const SESSION_FULL_MESSAGE: &str = "Session is full";
pub const DUPLICATE_BOOKING_MESSAGE: &str = "You already have a booking for this session";
pub const SESSION_NOT_FOUND: &str = "Session not found";
pub const BOOKING_NOT_FOUND: &str = "Booking not found";
pub const CANCEL_NOT_FOUND: &str = "No booking found for this email address in this session";

/// SQLite extended result code for a violated UNIQUE constraint.
const SQLITE_UNIQUE_VIOLATION: &str = "2067";
/// PostgreSQL SQLSTATE `unique_violation`.
const POSTGRES_UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Session is full")]
    SessionFull,
    #[error("You already have a booking for this session")]
    DuplicateBooking,
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Maps a unique-constraint violation to `DuplicateBooking`, leaving every other
    /// database error untouched.
    pub fn from_booking_insert(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            return AppError::DuplicateBooking;
        }
        AppError::Database(err)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::SessionFull | AppError::DuplicateBooking => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == SQLITE_UNIQUE_VIOLATION || code == POSTGRES_UNIQUE_VIOLATION)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::SessionFull => SESSION_FULL_MESSAGE.to_string(),
            AppError::DuplicateBooking => DUPLICATE_BOOKING_MESSAGE.to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
