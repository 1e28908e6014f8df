//! # Error Types
//!
//! Domain-specific error types for facturexl-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  facturexl-core errors (this file)                                      │
//! │  ├── CoreError        - Schedule / frequency errors                     │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  Engine errors (in app)                                                 │
//! │  └── ApiError         - What the web app sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Invoicing web app       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The totals engine and the rounding primitive never fail, so nothing
//! here describes arithmetic errors.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Anchor month outside 1..=12.
    ///
    /// ## When This Occurs
    /// - A `custom` subscription saved with month 0 or 13
    /// - A form posting a 0-indexed month
    #[error("Invalid anchor month {month}: expected 1-12")]
    InvalidAnchorMonth { month: u32 },

    /// A frequency that renews on a fixed calendar month was given no month.
    #[error("Frequency '{frequency}' requires an anchor month")]
    MissingAnchorMonth { frequency: String },

    /// Frequency name is not one of the known renewal frequencies.
    #[error("Unknown renewal frequency: '{0}'")]
    UnknownFrequency(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The engine itself accepts any numeric input; these are raised by the
/// boundary validators in [`crate::validation`] before values reach it.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Start date is after end date.
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
