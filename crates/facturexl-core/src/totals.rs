//! # Totals Engine
//!
//! Computes line and document totals for invoices, credit notes, quotes and
//! subscription invoices.
//!
//! ## Line Cascade
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity × unit_price ───────────────────────────────► subtotal        │
//! │        2  × 12 000                                       24 000         │
//! │                                                                         │
//! │  subtotal × discount% ────────────────────────────────► discount        │
//! │   24 000  × 10%                                          2 400          │
//! │                                                                         │
//! │  subtotal − discount ─────────────────────────────────► after discount  │
//! │                                                          21 600   (HT)  │
//! │                                                                         │
//! │  after discount × tax% ───────────────────────────────► tax             │
//! │   21 600        × 11%                                    2 376          │
//! │                                                                         │
//! │  after discount + tax ────────────────────────────────► line total      │
//! │                                                          23 976   (TTC) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are summed in full precision. Rounding to the 5 F denomination
//! happens once per total, via [`TotalsResult::rounded`].

use tracing::debug;

use crate::money::Money;
use crate::types::{LineBreakdown, LineItem, TotalsResult};

/// Computes the intermediate amounts of a single line.
///
/// ## Example
/// ```rust
/// use facturexl_core::money::Money;
/// use facturexl_core::totals::compute_line;
/// use facturexl_core::types::{LineItem, Percent};
///
/// let line = LineItem::new(2, Money::from_francs(12_000), Percent::from_integer(10), Percent::from_integer(11));
/// let breakdown = compute_line(&line);
/// assert_eq!(breakdown.after_discount, Money::from_francs(21_600));
/// assert_eq!(breakdown.line_total, Money::from_francs(23_976));
/// ```
pub fn compute_line(line: &LineItem) -> LineBreakdown {
    let subtotal = line.unit_price.multiply_quantity(line.quantity);
    let discount_amount = subtotal.percentage(line.discount_percent);
    let after_discount = subtotal - discount_amount;
    let tax_amount = after_discount.percentage(line.tax_percent);

    LineBreakdown {
        subtotal,
        discount_amount,
        after_discount,
        tax_amount,
        line_total: after_discount + tax_amount,
    }
}

/// Computes the document totals.
///
/// Never fails: an empty document is all zeros and degenerate lines
/// (zero quantity, negative price) contribute whatever their arithmetic gives.
pub fn compute_totals(lines: &[LineItem]) -> TotalsResult {
    compute_breakdown(lines).1
}

/// Computes every line's breakdown together with the document totals.
///
/// This is what the PDF renderer needs: one row per line plus the footer.
pub fn compute_breakdown(lines: &[LineItem]) -> (Vec<LineBreakdown>, TotalsResult) {
    let breakdowns: Vec<LineBreakdown> = lines.iter().map(compute_line).collect();

    let total_excl_tax: Money = breakdowns.iter().map(|b| b.after_discount).sum();
    let total_tax: Money = breakdowns.iter().map(|b| b.tax_amount).sum();
    let totals = TotalsResult {
        total_excl_tax,
        total_tax,
        total_incl_tax: total_excl_tax + total_tax,
    };

    debug!(
        lines = lines.len(),
        total_excl_tax = %totals.total_excl_tax,
        total_tax = %totals.total_tax,
        total_incl_tax = %totals.total_incl_tax,
        "Computed document totals"
    );

    (breakdowns, totals)
}

// =============================================================================
// Unit Tests
// =============================================================================
