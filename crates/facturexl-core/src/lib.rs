//! # facturexl-core: Pure Billing Logic for FactureXL
//!
//! This crate holds the calculation logic behind FactureXL invoices and
//! subscriptions as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FactureXL Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                  Invoicing web app (out of tree)                │    │
//! │  │   Invoice form ──► PDF export ──► Subscriptions ──► Dashboard   │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    facturexl-engine (app)                       │    │
//! │  │    compute_totals, round, renewal_dates, next_renewal, ...      │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │             ★ facturexl-core (THIS CRATE) ★                     │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐    │    │
//! │  │   │   types   │  │   money   │  │  totals   │  │ schedule  │    │    │
//! │  │   │ LineItem  │  │   Money   │  │ HT / TGC  │  │ renewals  │    │    │
//! │  │   │ Frequency │  │ 5 F round │  │ / TTC     │  │ alerts    │    │    │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘    │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, TotalsResult, Frequency, Subscription, ...)
//! - [`money`] - Decimal Money type and CFP denomination rounding
//! - [`totals`] - Line and document totals
//! - [`schedule`] - Renewal dates and the renewal-approaching predicate
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation for caller input
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, `now` is a parameter
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Decimal Money**: exact arithmetic, rounded once for presentation
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use facturexl_core::{compute_totals, LineItem, Money, Percent};
//!
//! let line = LineItem::new(
//!     2,
//!     Money::from_francs(12_000),
//!     Percent::from_integer(10),
//!     Percent::from_integer(11),
//! );
//!
//! let totals = compute_totals(&[line]);
//! assert_eq!(totals.total_incl_tax, Money::from_francs(23_976));
//!
//! // Printed on the invoice: nearest 5 F
//! assert_eq!(totals.rounded().total_incl_tax, 23_975);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod schedule;
pub mod totals;
pub mod types;
pub mod validation;

#[cfg(test)]
mod props;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use facturexl_core::Money` instead of
// `use facturexl_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{round_to_denomination, Money};
pub use schedule::{
    find_next_renewal, generate_renewal_dates, is_renewal_approaching,
    is_renewal_approaching_with_window, AlertWindow, RenewalRule,
};
pub use totals::{compute_breakdown, compute_line, compute_totals};
pub use types::*;
