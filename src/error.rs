//! Application error type and its HTTP rendering.
//!
//! Every failure leaving a handler is an [`AppError`], rendered as
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short URL not found.", "details": {} } }
//! ```
//!
//! Backend failures never carry raw backend messages in `details`; those are
//! logged where the failure happens.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::RegistryError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input: bad URL, missing identifier, unreadable body.
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Registry unavailable, timed out, or failed unexpectedly.
    #[error("{message}")]
    Store { message: String, details: Value },

    /// The identifier allocation loop ran out of attempts.
    #[error("{message}")]
    AllocationExhausted { message: String, details: Value },

    /// Registry connection settings are missing.
    #[error("{message}")]
    Misconfigured { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn store(message: impl Into<String>, details: Value) -> Self {
        Self::Store {
            message: message.into(),
            details,
        }
    }

    pub fn allocation_exhausted(attempts: u32) -> Self {
        Self::AllocationExhausted {
            message: "Could not allocate a short ID, please retry".to_string(),
            details: json!({ "attempts": attempts }),
        }
    }

    pub fn missing_short_id() -> Self {
        Self::bad_request("Short ID is missing.", json!({}))
    }

    pub fn misconfigured() -> Self {
        Self::Misconfigured {
            message: "Server misconfigured (missing registry configuration).".to_string(),
            details: json!({}),
        }
    }

    /// Maps a registry failure to the client-facing error for `operation`.
    ///
    /// Only the operation name is exposed; the backend message is dropped.
    pub fn from_registry(err: &RegistryError, operation: &'static str) -> Self {
        match err {
            RegistryError::Misconfigured(_) => Self::misconfigured(),
            RegistryError::Timeout(_) => Self::store(
                "Registry timed out",
                json!({ "operation": operation }),
            ),
            RegistryError::UniquenessViolation(_) | RegistryError::Backend(_) => Self::store(
                "Internal server error",
                json!({ "operation": operation }),
            ),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::Store { .. } => "store_error",
            Self::AllocationExhausted { .. } => "allocation_exhausted",
            Self::Misconfigured { .. } => "misconfigured",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store { .. } | Self::AllocationExhausted { .. } | Self::Misconfigured { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether a client may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store { .. } | Self::AllocationExhausted { .. })
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            Self::Validation { message, details }
            | Self::NotFound { message, details }
            | Self::Store { message, details }
            | Self::AllocationExhausted { message, details }
            | Self::Misconfigured { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        AppError::bad_request("Invalid request", json!({ "fields": fields }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("x", json!({})).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::store("x", json!({})).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::allocation_exhausted(10).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::misconfigured().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_retryable() {
        assert!(AppError::store("x", json!({})).is_retryable());
        assert!(AppError::allocation_exhausted(10).is_retryable());
        assert!(!AppError::bad_request("x", json!({})).is_retryable());
        assert!(!AppError::not_found("x", json!({})).is_retryable());
        assert!(!AppError::misconfigured().is_retryable());
    }

    #[test]
    fn test_registry_errors_do_not_leak_backend_detail() {
        let err = AppError::from_registry(
            &RegistryError::Backend("password authentication failed for user \"app\"".into()),
            "insert",
        );

        let info = err.to_error_info();
        assert_eq!(info.code, "store_error");
        assert!(!info.message.contains("password"));
        assert!(!info.details.to_string().contains("password"));
        assert_eq!(info.details["operation"], "insert");
    }

    #[test]
    fn test_registry_timeout_maps_to_store_error() {
        let err = AppError::from_registry(
            &RegistryError::Timeout(Duration::from_millis(50)),
            "find_by_short_id",
        );
        assert_eq!(err.code(), "store_error");
    }

    #[test]
    fn test_registry_misconfiguration_maps_to_misconfigured() {
        let err = AppError::from_registry(
            &RegistryError::Misconfigured("DATABASE_URL".into()),
            "find_by_long_url",
        );
        assert_eq!(err.code(), "misconfigured");
    }

    #[test]
    fn test_validation_errors_list_failing_fields() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("long_url", validator::ValidationError::new("length"));

        let info = AppError::from(errors).to_error_info();

        assert_eq!(info.code, "validation_error");
        assert_eq!(info.details["fields"], json!(["long_url"]));
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::bad_request("Invalid URL", json!({}));
        assert_eq!(err.to_string(), "Invalid URL");
    }
}
