//! Domain error taxonomy shared by services and transport adapters.
//!
//! [`Error`] is the single error type crossing driving-port boundaries. Each
//! value carries a stable [`ErrorCode`], a human-readable message, optional
//! structured details, and the trace identifier active when the error was
//! constructed. Transport layers map the code to a wire status; the domain
//! never references HTTP concepts directly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TraceId;

/// Stable machine-readable error categories.
///
/// Codes mirror the workflow taxonomy: request-shape problems, missing or
/// invalid authentication, insufficient role, absent records, terminal-state
/// conflicts, dependency outages, and unexpected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request payload or parameters failed validation.
    InvalidRequest,
    /// Authentication is missing or invalid.
    Unauthorized,
    /// The authenticated user lacks permission for the operation.
    Forbidden,
    /// The referenced record does not exist.
    NotFound,
    /// The operation conflicts with the record's current state.
    Conflict,
    /// A required dependency (database, file store) is unavailable.
    ServiceUnavailable,
    /// An unexpected internal fault occurred.
    InternalError,
}

/// Validation failures raised while constructing an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The error message was empty after trimming.
    #[error("error message must not be empty")]
    EmptyMessage,
}

/// Wire representation used for serde round-trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

/// Domain error carrying a code, message, optional details, and trace id.
///
/// Construct values through the convenience constructors or [`Error::try_new`];
/// fields stay private so every instance passes validation. The active
/// [`TraceId`] is captured automatically at construction time.
///
/// # Examples
/// ```
/// use backend::domain::{Error, ErrorCode};
///
/// let error = Error::not_found("document not found");
/// assert_eq!(error.code(), ErrorCode::NotFound);
/// assert_eq!(error.message(), "document not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
    trace_id: Option<String>,
}

impl Error {
    /// Create an error after validating the message is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorValidationError::EmptyMessage`] when the message is
    /// blank after trimming.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        })
    }

    fn build(code: ErrorCode, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "unspecified error".to_owned();
        }
        Self {
            code,
            message,
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Create an [`ErrorCode::InvalidRequest`] error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::InvalidRequest, message)
    }

    /// Create an [`ErrorCode::Unauthorized`] error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Unauthorized, message)
    }

    /// Create an [`ErrorCode::Forbidden`] error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Forbidden, message)
    }

    /// Create an [`ErrorCode::NotFound`] error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::NotFound, message)
    }

    /// Create an [`ErrorCode::Conflict`] error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Conflict, message)
    }

    /// Create an [`ErrorCode::ServiceUnavailable`] error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::ServiceUnavailable, message)
    }

    /// Create an [`ErrorCode::InternalError`] error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::InternalError, message)
    }

    /// Attach structured details describing the failure.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Override the captured trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: String) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// The machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured details, when present.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// The trace identifier captured at construction, when one was in scope.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(dto: ErrorDto) -> Result<Self, Self::Error> {
        let mut error = Self::try_new(dto.code, dto.message)?;
        error.details = dto.details;
        error.trace_id = dto.trace_id;
        Ok(error)
    }
}

impl From<Error> for ErrorDto {
    fn from(error: Error) -> Self {
        Self {
            code: error.code,
            message: error.message,
            details: error.details,
            trace_id: error.trace_id,
        }
    }
}

#[cfg(test)]
mod tests;
