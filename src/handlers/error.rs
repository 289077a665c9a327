//! Mapping of [`StudyError`] kinds to HTTP responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::StudyError;

/// Seconds a client should wait before resubmitting after a transient grading failure
pub const RETRY_AFTER_SECS: u64 = 60;

pub fn status_for(err: &StudyError) -> StatusCode {
    match err {
        StudyError::GradingTransient(_) | StudyError::GradingCancelled => StatusCode::SERVICE_UNAVAILABLE,
        StudyError::GradingMalformed(_) | StudyError::GradingFatal(_) => StatusCode::BAD_GATEWAY,
        StudyError::AccessDenied(_) => StatusCode::FORBIDDEN,
        StudyError::NotFound(_) => StatusCode::NOT_FOUND,
        StudyError::Validation(_) => StatusCode::BAD_REQUEST,
        StudyError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for StudyError {
    fn into_response(self) -> Response {
        let status = status_for(&self);

        let message = match &self {
            StudyError::Database(detail) => {
                tracing::error!("Database error: {}", detail);
                "internal error".to_string()
            }
            other => {
                tracing::debug!(kind = other.kind(), "Request failed: {}", other);
                other.to_string()
            }
        };

        let mut response = (status, Json(json!({ "error": self.kind(), "message": message }))).into_response();
        if matches!(self, StudyError::GradingTransient(_)) {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS));
        }
        response
    }
}
