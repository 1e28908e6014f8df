//! # Schedule Commands
//!
//! Subscription renewal dates and the dashboard alert.
//!
//! Frequencies arrive as the free text stored on the subscription record.
//! An unknown name produces an empty schedule, no next renewal, and an alert
//! based on the end date alone, never an error.

use chrono::NaiveDate;
use facturexl_core::schedule::{
    is_renewal_approaching_by_name, next_renewal_by_name, renewal_dates_by_name,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Context;
use crate::error::ApiError;

/// Parameters of `renewal_dates`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalDatesParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: String,
    #[serde(default)]
    pub anchor_month: Option<u32>,
}

/// Result of `renewal_dates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatesResponse {
    pub dates: Vec<NaiveDate>,
}

pub fn renewal_dates(params: RenewalDatesParams) -> Result<DatesResponse, ApiError> {
    let dates = renewal_dates_by_name(
        params.start_date,
        params.end_date,
        &params.frequency,
        params.anchor_month,
    )?;

    debug!(frequency = %params.frequency, count = dates.len(), "renewal_dates command");
    Ok(DatesResponse { dates })
}

/// Parameters of `next_renewal`. `now` defaults to today.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextRenewalParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: String,
    #[serde(default)]
    pub anchor_month: Option<u32>,
    #[serde(default)]
    pub now: Option<NaiveDate>,
}

/// Result of `next_renewal`; `null` once the subscription has no renewal left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextRenewalResponse {
    pub next_renewal: Option<NaiveDate>,
}

pub fn next_renewal(
    params: NextRenewalParams,
    ctx: &Context<'_>,
) -> Result<NextRenewalResponse, ApiError> {
    let now = params.now.unwrap_or(ctx.today);
    let next_renewal = next_renewal_by_name(
        params.start_date,
        &params.frequency,
        now,
        params.end_date,
        params.anchor_month,
    )?;

    Ok(NextRenewalResponse { next_renewal })
}

/// Parameters of `renewal_approaching`.
///
/// Only `endDate` is required: without a start date or frequency the alert
/// looks at the end date alone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalApproachingParams {
    pub end_date: NaiveDate,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub anchor_month: Option<u32>,
    #[serde(default)]
    pub now: Option<NaiveDate>,
}

/// Result of `renewal_approaching`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApproachingResponse {
    pub approaching: bool,
}

/// Evaluates the alert with the configured lead and grace windows.
pub fn renewal_approaching(
    params: RenewalApproachingParams,
    ctx: &Context<'_>,
) -> Result<ApproachingResponse, ApiError> {
    let now = params.now.unwrap_or(ctx.today);
    let approaching = is_renewal_approaching_by_name(
        params.end_date,
        params.start_date,
        params.frequency.as_deref(),
        params.anchor_month,
        now,
        ctx.config.alert_window,
    )?;

    Ok(ApproachingResponse { approaching })
}
