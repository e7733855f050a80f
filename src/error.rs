//! Error types for the concierge and payroll service.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while answering guests, computing
//! payroll, or recording attendance.

use thiserror::Error;

/// The main error type for the service.
///
/// All fallible operations return this error type, making it easy to map
/// failures onto HTTP responses in one place.
///
/// # Example
///
/// ```
/// use innkeeper::error::ServiceError;
///
/// let error = ServiceError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required environment variable is not set.
    #[error("Environment variable {name} is not set")]
    MissingEnvironment {
        /// The name of the variable.
        name: String,
    },

    /// A payroll input field was missing or out of range.
    #[error("Invalid payroll input '{field}': {message}")]
    InvalidPayrollInput {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The document store refused a filtered query (for example a missing index).
    #[error("Query rejected on '{collection}': {message}")]
    QueryRejected {
        /// The collection that was queried.
        collection: String,
        /// The reason given by the store.
        message: String,
    },

    /// Any other document store failure.
    #[error("Store error: {message}")]
    Store {
        /// A description of the failure.
        message: String,
    },

    /// A call to an external service failed.
    #[error("Upstream '{service}' failed: {message}")]
    Upstream {
        /// The external service (e.g. "gemini", "messenger").
        service: String,
        /// A description of the failure.
        message: String,
    },

    /// The employee ID entered at an attendance terminal is not on the roster.
    #[error("Unknown employee: {employee_id}")]
    UnknownEmployee {
        /// The ID that was entered.
        employee_id: String,
    },

    /// The employee already has an open check-in for the day.
    #[error("Employee {employee_id} is already checked in")]
    DuplicateCheckIn {
        /// The employee.
        employee_id: String,
    },

    /// A check-out was attempted without an open check-in.
    #[error("Employee {employee_id} is not checked in")]
    NotCheckedIn {
        /// The employee.
        employee_id: String,
    },

    /// The attendance code is unknown or has expired.
    #[error("Attendance code is invalid or expired")]
    InvalidAttendanceCode,

    /// Too many failed attendance attempts from the same client.
    #[error("Too many failed attempts; retry in {retry_after_secs}s")]
    AttendanceLocked {
        /// Seconds until the lockout window ends.
        retry_after_secs: u64,
    },

    /// The caller did not present a valid admin token.
    #[error("Unauthorized")]
    Unauthorized,

    /// A requested record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The kind of record (e.g. "payroll run").
        kind: String,
        /// The identifier that was looked up.
        id: String,
    },
}

impl ServiceError {
    /// Shorthand for an [`ServiceError::InvalidPayrollInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPayrollInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// An [`ServiceError::InvalidPayrollInput`] for an amount that cannot be
    /// represented in cents.
    pub fn out_of_range(field: impl Into<String>) -> Self {
        Self::invalid_input(field, "amount out of range")
    }

    /// Shorthand for an [`ServiceError::Upstream`].
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return ServiceError.
pub type ServiceResult<T> = Result<T, ServiceError>;
