//! # API Error Type
//!
//! Unified error type for engine commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Engine                             │
//! │                                                                         │
//! │  stdin ──► serde_json ── malformed? ──► INVALID_REQUEST ──┐             │
//! │                 │                                         │             │
//! │                 ▼                                         │             │
//! │           dispatch ──── ValidationError ──► VALIDATION_ERROR            │
//! │                 │                                         │             │
//! │                 ▼                                         ▼             │
//! │           facturexl-core ── CoreError ──► ApiError ──► stdout           │
//! │                                                  { "error": {...} }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use facturexl_core::{CoreError, ValidationError};
use serde::Serialize;

use crate::config::ConfigError;

/// Error returned by a failed command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INVALID_ANCHOR_MONTH",
///   "message": "Invalid anchor month 13: expected 1-12"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for engine responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body is not valid JSON or has the wrong shape
    InvalidRequest,

    /// Input validation failed
    ValidationError,

    /// Anchor month missing or outside 1-12
    InvalidAnchorMonth,

    /// Frequency name not recognised
    UnknownFrequency,

    /// Environment configuration is invalid
    ConfigError,

    /// Reading stdin or writing stdout failed
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidAnchorMonth { .. } | CoreError::MissingAnchorMonth { .. } => {
                ApiError::new(ErrorCode::InvalidAnchorMonth, message)
            }
            CoreError::UnknownFrequency(_) => ApiError::new(ErrorCode::UnknownFrequency, message),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::invalid_request(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O failure: {}", err);
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_codes() {
        let err: ApiError = CoreError::InvalidAnchorMonth { month: 13 }.into();
        assert_eq!(err.code, ErrorCode::InvalidAnchorMonth);
        assert_eq!(err.message, "Invalid anchor month 13: expected 1-12");

        let err: ApiError = CoreError::UnknownFrequency("weekly".to_string()).into();
        assert_eq!(err.code, ErrorCode::UnknownFrequency);

        let err: ApiError = CoreError::Validation(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "quantity must not be negative");
    }

    #[test]
    fn test_serialization() {
        let err = ApiError::invalid_request("expected value at line 1 column 1");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INVALID_REQUEST");
        assert_eq!(json["message"], "expected value at line 1 column 1");
    }
}
