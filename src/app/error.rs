use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::summarize::SummarizeError;
use crate::TARGET_WEB_REQUEST;

/// An error reported to the caller with the `{ success: false, error, message }` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    message: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// `"fail"` for client errors, `"error"` for everything else.
    pub fn kind(&self) -> &'static str {
        if self.status.is_client_error() {
            "fail"
        } else {
            "error"
        }
    }

    /// Map a failure of the orchestration itself. The cause is only exposed when
    /// `show_details` is set.
    pub fn orchestration(e: SummarizeError, show_details: bool) -> Self {
        error!(target: TARGET_WEB_REQUEST, "Error in batch summarization orchestrator: {}", e);
        if show_details {
            ApiError::internal(format!("Failed to summarize articles: {}", e))
        } else {
            ApiError::internal("Failed to summarize articles")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.kind(),
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_status() {
        assert_eq!(ApiError::bad_request("x").kind(), "fail");
        assert_eq!(ApiError::new(StatusCode::NOT_FOUND, "x").kind(), "fail");
        assert_eq!(ApiError::internal("x").kind(), "error");
    }

    #[test]
    fn test_orchestration_errors_are_server_errors() {
        let e = ApiError::orchestration(SummarizeError::EmptyBatch, false);
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message, "Failed to summarize articles");

        let e = ApiError::orchestration(SummarizeError::EmptyBatch, true);
        assert!(e.message.starts_with("Failed to summarize articles: "));
        assert!(e.message.contains("no articles"));
    }
}
