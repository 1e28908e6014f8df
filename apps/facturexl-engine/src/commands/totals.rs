//! # Totals Commands
//!
//! Document totals and the 5 F presentation rounding.

use facturexl_core::validation::validate_line_items;
use facturexl_core::{
    compute_breakdown, compute_totals as core_totals, round_to_denomination, LineBreakdown,
    LineItem, RoundedTotals, TotalsResult,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Context;
use crate::error::ApiError;

/// Parameters of `compute_totals`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeTotalsParams {
    pub lines: Vec<LineItem>,

    /// Also return the per-line amounts.
    #[serde(default)]
    pub breakdown: bool,
}

/// Result of `compute_totals`.
///
/// `totals` is exact; `rounded` is what the invoice prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsResponse {
    pub totals: TotalsResult,
    pub rounded: RoundedTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<LineBreakdown>>,
}

/// Computes the HT / TGC / TTC totals of a document.
///
/// With `FACTUREXL_STRICT_LINES` set, lines the invoice form would refuse
/// (negative quantity or price, discount outside 0-100) are rejected.
pub fn compute_totals(
    params: ComputeTotalsParams,
    ctx: &Context<'_>,
) -> Result<TotalsResponse, ApiError> {
    if ctx.config.strict_lines {
        validate_line_items(&params.lines)?;
    }

    let (lines, totals) = if params.breakdown {
        let (lines, totals) = compute_breakdown(&params.lines);
        (Some(lines), totals)
    } else {
        (None, core_totals(&params.lines))
    };

    debug!(lines = params.lines.len(), total = %totals.total_incl_tax, "compute_totals command");

    Ok(TotalsResponse {
        totals,
        rounded: totals.rounded(),
        lines,
    })
}

/// Parameters of `round`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoundParams {
    pub amount: Decimal,
}

/// Result of `round`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundResponse {
    pub rounded: i64,
}

/// Rounds one amount to the nearest 5 F.
pub fn round(params: RoundParams) -> RoundResponse {
    RoundResponse {
        rounded: round_to_denomination(params.amount),
    }
}
