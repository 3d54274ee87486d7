use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures raised while evaluating a report in application code.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Error parsing date string '{0}'")]
    InvalidDate(String),

    #[error("Failed to parse number '{0}' in $convert")]
    InvalidNumber(String),

    #[error("can't $divide by zero")]
    DivideByZero,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),

    #[error("Failed to decode report row: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        match &self {
            AppError::Database(_) => error!("Database error: {message}"),
            AppError::Decode(_) => error!("Decode error: {message}"),
            AppError::Report(_) => error!("Report error: {message}"),
        }

        let body = Json(json!({
            "message": message,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_error_is_internal_server_error() {
        let response = AppError::from(ReportError::InvalidDate("yesterday".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_report_error_message_passthrough() {
        let err = AppError::from(ReportError::DivideByZero);
        assert_eq!(err.to_string(), "can't $divide by zero");
    }
}
