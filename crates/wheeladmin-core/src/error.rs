//! Error types for wheeladmin-core
//!
//! Every failure talking to the rental backend ends up here, with an error
//! code, a severity and suggestions for the operator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The backend could not be reached
    BackendUnreachable,
    /// The backend answered with a non-success HTTP status
    BackendStatus,
    /// The backend answered with `success: false`
    BackendRejected,
    /// The backend body could not be decoded
    InvalidResponse,
    /// Record not found
    NotFound,
    /// Validation error
    ValidationError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::BackendUnreachable => write!(f, "BACKEND_UNREACHABLE"),
            ErrorCode::BackendStatus => write!(f, "BACKEND_STATUS"),
            ErrorCode::BackendRejected => write!(f, "BACKEND_REJECTED"),
            ErrorCode::InvalidResponse => write!(f, "INVALID_RESPONSE"),
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for wheeladmin-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Backend unreachable: {message}")]
    BackendUnreachable { message: String },

    #[error("Backend returned status {status}: {message}")]
    BackendStatus { status: u16, message: String },

    #[error("Backend rejected the request: {message}")]
    BackendRejected { message: String },

    #[error("Invalid backend response: {message}")]
    InvalidResponse { message: String },

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl CoreError {
    pub fn not_found(resource: &str, id: &str) -> Self {
        CoreError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::BackendUnreachable { .. } => ErrorCode::BackendUnreachable,
            CoreError::BackendStatus { .. } => ErrorCode::BackendStatus,
            CoreError::BackendRejected { .. } => ErrorCode::BackendRejected,
            CoreError::InvalidResponse { .. } => ErrorCode::InvalidResponse,
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::BackendUnreachable { .. } => ErrorSeverity::Error,
            CoreError::BackendStatus { status, .. } if *status >= 500 => ErrorSeverity::Error,
            CoreError::BackendStatus { .. } => ErrorSeverity::Warning,
            CoreError::BackendRejected { .. } => ErrorSeverity::Warning,
            CoreError::InvalidResponse { .. } => ErrorSeverity::Error,
            CoreError::NotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::BackendUnreachable { .. } => {
                details = details
                    .with_suggestion("Check that backend.base_url points at a running backend.".to_string())
                    .with_suggestion("Raise backend.timeout_secs if the backend is slow.".to_string());
            }
            CoreError::BackendStatus { status, .. } => {
                details = details.with_detail(serde_json::json!({ "status": status }));
                if *status == 404 {
                    details = details
                        .with_suggestion("Check the path configured under backend.endpoints.".to_string());
                }
            }
            CoreError::InvalidResponse { .. } => {
                details = details.with_suggestion(
                    "The backend payload shape may have changed; check the endpoint manually.".to_string(),
                );
            }
            CoreError::NotFound { resource, .. } => {
                details = details.with_suggestion(format!("Reload the {} list and try again.", resource));
            }
            _ => {}
        }

        details
    }

    /// Short message suitable for a toast
    pub fn user_message(&self) -> String {
        match self {
            CoreError::BackendRejected { message } | CoreError::ValidationError { message } => message.clone(),
            CoreError::NotFound { .. } => self.to_string(),
            _ => "The backend request failed. Please try again.".to_string(),
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<reqwest::Error> for CoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            CoreError::InvalidResponse {
                message: error.to_string(),
            }
        } else {
            CoreError::BackendUnreachable {
                message: error.to_string(),
            }
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Record the operation targeted, if any
    pub record_id: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            record_id: None,
        }
    }

    pub fn with_record(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let record = context.record_id.as_deref().unwrap_or("-");
        match error.severity() {
            ErrorSeverity::Info => log::info!(
                target: "wheeladmin::error",
                "[{}] {} - Operation: {} - Record: {}",
                error.code(),
                error,
                context.operation,
                record
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "wheeladmin::error",
                "[{}] {} - Operation: {} - Record: {}",
                error.code(),
                error,
                context.operation,
                record
            ),
            ErrorSeverity::Error => log::error!(
                target: "wheeladmin::error",
                "{} - Operation: {} - Record: {}",
                error.to_details(),
                context.operation,
                record
            ),
        }
    }
}

// ==================== Tests ====================
