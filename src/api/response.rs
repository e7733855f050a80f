//! Response types for the HTTP API.
//!
//! This module defines the error body returned by every endpoint and the
//! mapping from [`ServiceError`] to status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::knowledge::ClassificationSource;
use crate::models::{AttendanceCode, AttendanceRecord, QuestionCategory};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs a status with an error body.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ServiceError> for ApiErrorResponse {
    fn from(error: ServiceError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            ServiceError::ConfigNotFound { .. }
            | ServiceError::ConfigParseError { .. }
            | ServiceError::MissingEnvironment { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            ServiceError::InvalidPayrollInput { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_PAYROLL_INPUT",
                    message,
                    format!("Check the '{}' field of the payroll input", field),
                ),
            ),
            ServiceError::QueryRejected { .. } | ServiceError::Store { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("STORE_ERROR", "Document store error", message),
            ),
            ServiceError::Upstream { service, .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::with_details(
                    "UPSTREAM_ERROR",
                    format!("External service '{}' failed", service),
                    message,
                ),
            ),
            ServiceError::UnknownEmployee { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("UNKNOWN_EMPLOYEE", message),
            ),
            ServiceError::DuplicateCheckIn { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_CHECK_IN", message),
            ),
            ServiceError::NotCheckedIn { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("NOT_CHECKED_IN", message),
            ),
            ServiceError::InvalidAttendanceCode => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_ATTENDANCE_CODE", message),
            ),
            ServiceError::AttendanceLocked { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                ApiError::with_details(
                    "ATTENDANCE_LOCKED",
                    message,
                    format!("retry_after_secs={}", retry_after_secs),
                ),
            ),
            ServiceError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHORIZED", "A valid admin bearer token is required"),
            ),
            ServiceError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
            }
        };
        ApiErrorResponse { status, error }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Body of `POST /questions`.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    /// Stored question id.
    pub id: uuid::Uuid,
    /// Assigned category.
    pub category: QuestionCategory,
    /// Whether the model or the rules decided.
    pub source: ClassificationSource,
}

/// Body of `POST /attendance/codes`.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceCodeResponse {
    /// The issued code; the terminal renders it as a QR image.
    #[serde(flatten)]
    pub code: AttendanceCode,
}

/// Body of the check-in and check-out endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PunchResponse {
    /// The updated record.
    pub record: AttendanceRecord,
    /// Minutes worked, once checked out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worked_minutes: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::invalid_input("daily_rate", "bad"), StatusCode::BAD_REQUEST),
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                ServiceError::NotFound {
                    kind: "payroll run".to_string(),
                    id: "x".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::DuplicateCheckIn {
                    employee_id: "emp_001".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::AttendanceLocked { retry_after_secs: 30 },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (ServiceError::upstream("gemini", "timeout"), StatusCode::BAD_GATEWAY),
            (
                ServiceError::Store {
                    message: "down".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status);
        }
    }

    #[test]
    fn test_locked_error_carries_retry_hint() {
        let response: ApiErrorResponse = ServiceError::AttendanceLocked { retry_after_secs: 42 }.into();
        assert_eq!(response.error.code, "ATTENDANCE_LOCKED");
        assert_eq!(response.error.details.as_deref(), Some("retry_after_secs=42"));
    }
}
