//! # Validation Module
//!
//! Input validation for the invoicing form and API boundary.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Invoice form (TypeScript)                                     │
//! │  ├── Required fields, numeric inputs                                    │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API boundary (Rust)                                           │
//! │  └── THIS MODULE: quantity, price, percentage and date range checks     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine (totals, schedule)                                     │
//! │  └── NO checks: arithmetic passes every value through                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use facturexl_core::validation::{validate_discount_percent, validate_quantity};
//! use facturexl_core::types::Percent;
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_discount_percent(Percent::from_integer(110)).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, Percent};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must not be negative (0 is allowed: the line contributes nothing)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must not be negative (0 is allowed: free items)
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit_price".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be between 0 and 100
pub fn validate_discount_percent(discount: Percent) -> ValidationResult<()> {
    if discount < Percent::zero() || discount > Percent::from_integer(100) {
        return Err(ValidationError::OutOfRange {
            field: "discount_percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a tax percentage.
///
/// ## Rules
/// - Must not be negative
/// - No upper limit (New Caledonian TGC rates are 0 to 22%)
pub fn validate_tax_percent(tax: Percent) -> ValidationResult<()> {
    if tax < Percent::zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: "tax_percent".to_string(),
        });
    }

    Ok(())
}

/// Validates every field of a line item.
pub fn validate_line_item(line: &LineItem) -> ValidationResult<()> {
    validate_quantity(line.quantity)?;
    validate_unit_price(line.unit_price)?;
    validate_discount_percent(line.discount_percent)?;
    validate_tax_percent(line.tax_percent)?;
    Ok(())
}

/// Validates all lines of a document, stopping at the first failure.
///
/// The failing field is prefixed with its line number (1-based), e.g.
/// `lines[2].quantity`.
pub fn validate_line_items(lines: &[LineItem]) -> ValidationResult<()> {
    for (index, line) in lines.iter().enumerate() {
        validate_line_item(line).map_err(|e| prefix_field(e, index + 1))?;
    }

    Ok(())
}

fn prefix_field(err: ValidationError, line_number: usize) -> ValidationError {
    let prefix = |field: String| format!("lines[{line_number}].{field}");
    match err {
        ValidationError::MustNotBeNegative { field } => ValidationError::MustNotBeNegative {
            field: prefix(field),
        },
        ValidationError::OutOfRange { field, min, max } => ValidationError::OutOfRange {
            field: prefix(field),
            min,
            max,
        },
        other => other,
    }
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates a subscription period.
///
/// ## Rules
/// - `start` must not be after `end` (a single-day period is allowed)
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::InvertedRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
