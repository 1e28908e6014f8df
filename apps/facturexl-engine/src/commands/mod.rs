//! # Engine Commands
//!
//! Every request the invoicing app can send.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (Request, Response, dispatch)
//! ├── totals.rs    ◄─── compute_totals, round
//! └── schedule.rs  ◄─── renewal_dates, next_renewal, renewal_approaching
//! ```
//!
//! ## Request Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {                                                                      │
//! │    "command": "renewal_dates",       ◄── selects the Request variant    │
//! │    "startDate": "2024-01-01",        ◄── remaining keys are the params  │
//! │    "endDate": "2026-12-31",                                             │
//! │    "frequency": "custom",                                               │
//! │    "anchorMonth": 6                                                     │
//! │  }                                                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  dispatch(request, &ctx) ──► Response ──► { "dates": [...] }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod schedule;
pub mod totals;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::ApiError;

use self::schedule::{
    ApproachingResponse, DatesResponse, NextRenewalParams, NextRenewalResponse,
    RenewalApproachingParams, RenewalDatesParams,
};
use self::totals::{ComputeTotalsParams, RoundParams, RoundResponse, TotalsResponse};

/// A single engine request, tagged by its `command` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    ComputeTotals(ComputeTotalsParams),
    Round(RoundParams),
    RenewalDates(RenewalDatesParams),
    NextRenewal(NextRenewalParams),
    RenewalApproaching(RenewalApproachingParams),
}

impl Request {
    /// The command name as sent on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Request::ComputeTotals(_) => "compute_totals",
            Request::Round(_) => "round",
            Request::RenewalDates(_) => "renewal_dates",
            Request::NextRenewal(_) => "next_renewal",
            Request::RenewalApproaching(_) => "renewal_approaching",
        }
    }
}

/// The successful result of a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Totals(TotalsResponse),
    Round(RoundResponse),
    Dates(DatesResponse),
    NextRenewal(NextRenewalResponse),
    Approaching(ApproachingResponse),
}

/// What a command may read besides its own parameters.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    pub config: &'a EngineConfig,
    /// Used when a request omits `now`.
    pub today: NaiveDate,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a EngineConfig, today: NaiveDate) -> Self {
        Context { config, today }
    }
}

/// Runs one request against the core.
pub fn dispatch(request: Request, ctx: &Context<'_>) -> Result<Response, ApiError> {
    debug!(command = request.name(), "dispatch");

    match request {
        Request::ComputeTotals(params) => totals::compute_totals(params, ctx).map(Response::Totals),
        Request::Round(params) => Ok(Response::Round(totals::round(params))),
        Request::RenewalDates(params) => schedule::renewal_dates(params).map(Response::Dates),
        Request::NextRenewal(params) => {
            schedule::next_renewal(params, ctx).map(Response::NextRenewal)
        }
        Request::RenewalApproaching(params) => {
            schedule::renewal_approaching(params, ctx).map(Response::Approaching)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parsing() {
        let request: Request = serde_json::from_str(
            r#"{"command":"round","amount":"1237.5"}"#,
        )
        .unwrap();
        assert_eq!(request.name(), "round");

        let request: Request = serde_json::from_str(
            r#"{
                "command": "renewal_dates",
                "startDate": "2024-01-01",
                "endDate": "2024-12-31",
                "frequency": "monthly"
            }"#,
        )
        .unwrap();
        match request {
            Request::RenewalDates(params) => {
                assert_eq!(params.frequency, "monthly");
                assert_eq!(params.anchor_month, None);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        let result = serde_json::from_str::<Request>(r#"{"command":"delete_invoice"}"#);
        assert!(result.is_err());
    }
}
