//! Error types for Habitual
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to API clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    #[error("Goal not found: {0}")]
    GoalNotFound(String),

    #[error("Daily goal not found: {0}")]
    DailyGoalNotFound(String),

    #[error("Journal entry not found: {0}")]
    JournalEntryNotFound(String),

    #[error("Reminder not found: {0}")]
    ReminderNotFound(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Stable machine-readable code sent alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::HabitNotFound(_)
            | AppError::GoalNotFound(_)
            | AppError::DailyGoalNotFound(_)
            | AppError::JournalEntryNotFound(_)
            | AppError::ReminderNotFound(_) => "NOT_FOUND",
            AppError::Database(_)
            | AppError::Io(_)
            | AppError::Serialization(_)
            | AppError::Scheduler(_)
            | AppError::Notification(_)
            | AppError::Generic(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code() {
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "errorCode": self.code(),
        });

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_map_to_status() {
        let err = AppError::Validation("title is required".to_string());
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = AppError::HabitNotFound("abc".to_string());
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = AppError::Generic("boom".to_string());
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_serializes_as_message() {
        let err = AppError::GoalNotFound("g1".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Goal not found: g1\"");
    }
}
