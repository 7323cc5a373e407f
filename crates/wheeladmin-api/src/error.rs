//! Error types for wheeladmin-api

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use wheeladmin_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use wheeladmin_core::{AnomalyError, CoreError};
use wheeladmin_utils::escape_html;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Backend error: {0}")]
    Backend(#[from] CoreError),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnomalyError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Backend(CoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Backend(CoreError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Backend(_) => StatusCode::BAD_GATEWAY,
            ApiError::Analysis(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Text safe to show an operator
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Backend(e) => e.user_message(),
            ApiError::Analysis(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }

    /// Log with the operation that failed
    pub fn log(&self, operation: &str) {
        match self {
            ApiError::Backend(e) => DefaultErrorLogger.log_error(e, &ErrorContext::new(operation)),
            ApiError::Analysis(e) => log::warn!(target: "wheeladmin::error", "{} - Operation: {}", e, operation),
            other => log::info!(target: "wheeladmin::error", "{} - Operation: {}", other, operation),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ApiError::Backend(e) => serde_json::json!({ "error": e.to_details() }),
            other => serde_json::json!({ "error": { "message": other.user_message() } }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = format!(
            r#"<div class='bg-red-50 border border-red-200 rounded-lg p-4 text-sm text-red-700'>{}</div>"#,
            escape_html(&self.user_message())
        );
        (self.status(), Html(body)).into_response()
    }
}

/// Result type for HTML handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let missing: ApiError = CoreError::not_found("Transaction", "x").into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let down: ApiError = CoreError::BackendUnreachable {
            message: "refused".to_string(),
        }
        .into();
        assert_eq!(down.status(), StatusCode::BAD_GATEWAY);

        let analysis: ApiError = AnomalyError::EmptyResponse.into();
        assert_eq!(analysis.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(analysis.user_message(), "Could not analyze the transaction. Please try again.");
    }

    #[test]
    fn test_response_escapes_message() {
        let error = ApiError::BadRequest {
            message: "<script>".to_string(),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
