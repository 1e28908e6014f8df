//! # FactureXL Engine
//!
//! JSON front end for `facturexl-core`. The invoicing app spawns the
//! binary, writes one request to stdin and reads one response from stdout.
//!
//! ## Module Organization
//! ```text
//! facturexl_engine/
//! ├── lib.rs          ◄─── You are here (tracing setup, request handling)
//! ├── config.rs       ◄─── Environment configuration
//! ├── error.rs        ◄─── ApiError returned to the caller
//! └── commands/
//!     ├── mod.rs      ◄─── Request / Response / dispatch
//!     ├── totals.rs   ◄─── compute_totals, round
//!     └── schedule.rs ◄─── renewal_dates, next_renewal, renewal_approaching
//! ```
//!
//! ## Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin   {"command":"round","amount":"1237.5"}                          │
//! │  stdout  {"rounded":1240}                               exit code 0     │
//! │                                                                         │
//! │  stdin   {"command":"round"}                                            │
//! │  stdout  {"error":{"code":"INVALID_REQUEST","message":"..."}}  exit 1   │
//! │                                                                         │
//! │  stderr  tracing output, filtered by FACTUREXL_LOG                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;

use chrono::NaiveDate;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use commands::{dispatch, Context, Request};
use config::EngineConfig;
use error::ApiError;

/// Installs the global tracing subscriber, writing to stderr.
///
/// An unparsable filter falls back to `info`.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Wrapper written to stdout when a request fails.
#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a ApiError,
}

/// Parses and runs one request, returning the response body.
pub fn handle(input: &str, config: &EngineConfig, today: NaiveDate) -> Result<String, ApiError> {
    let request: Request = serde_json::from_str(input)?;
    let response = dispatch(request, &Context::new(config, today))?;
    Ok(to_json(&response, config.pretty_json)?)
}

/// Renders an error as the `{"error": {...}}` body.
pub fn error_body(error: &ApiError, pretty: bool) -> String {
    let envelope = ErrorEnvelope { error };
    to_json(&envelope, pretty).unwrap_or_else(|_| fallback_error_body(&error.message))
}

fn fallback_error_body(message: &str) -> String {
    serde_json::json!({ "error": { "code": "INTERNAL", "message": message } }).to_string()
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::Value;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()
    }

    fn run(input: &str) -> Value {
        let body = handle(input, &EngineConfig::default(), today()).unwrap();
        serde_json::from_str(&body).unwrap()
    }

    fn decimal(value: &Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    #[test]
    fn test_compute_totals_round_trip() {
        let out = run(r#"{
            "command": "compute_totals",
            "lines": [
                { "label": "Maintenance", "quantity": 2, "unitPrice": "12000",
                  "discountPercent": "10", "taxPercent": "11" }
            ]
        }"#);

        assert_eq!(decimal(&out["totals"]["totalExclTax"]), Decimal::from(21_600));
        assert_eq!(decimal(&out["totals"]["totalTax"]), Decimal::from(2_376));
        assert_eq!(decimal(&out["totals"]["totalInclTax"]), Decimal::from(23_976));
        assert_eq!(out["rounded"]["totalInclTax"], 23_975);
        assert!(out.get("lines").is_none());
    }

    #[test]
    fn test_percentages_default_to_zero() {
        let out = run(r#"{
            "command": "compute_totals",
            "lines": [{ "quantity": 3, "unitPrice": "1001" }]
        }"#);
        assert_eq!(out["rounded"]["totalInclTax"], 3_005);
        assert_eq!(out["rounded"]["totalTax"], 0);
    }

    #[test]
    fn test_empty_document() {
        let out = run(r#"{"command":"compute_totals","lines":[]}"#);
        assert_eq!(out["rounded"]["totalExclTax"], 0);
        assert_eq!(out["rounded"]["totalTax"], 0);
        assert_eq!(out["rounded"]["totalInclTax"], 0);
    }

    #[test]
    fn test_round() {
        assert_eq!(run(r#"{"command":"round","amount":"1237.5"}"#)["rounded"], 1_240);
        assert_eq!(run(r#"{"command":"round","amount":"-12.5"}"#)["rounded"], -15);
    }

    #[test]
    fn test_schedule_commands() {
        let out = run(r#"{
            "command": "renewal_dates",
            "startDate": "2024-01-01",
            "endDate": "2026-12-31",
            "frequency": "custom",
            "anchorMonth": 6
        }"#);
        assert_eq!(
            out["dates"],
            serde_json::json!(["2024-06-01", "2025-06-01", "2026-06-01"])
        );

        let out = run(r#"{
            "command": "next_renewal",
            "startDate": "2024-01-01",
            "endDate": "2026-12-31",
            "frequency": "yearly"
        }"#);
        assert_eq!(out["nextRenewal"], "2024-12-01");

        let out = run(r#"{
            "command": "renewal_approaching",
            "endDate": "2024-11-25"
        }"#);
        assert_eq!(out["approaching"], true);
    }

    #[test]
    fn test_errors() {
        let config = EngineConfig::default();

        let err = handle("not json", &config, today()).unwrap_err();
        assert_eq!(err.code, error::ErrorCode::InvalidRequest);

        let err = handle(
            r#"{"command":"renewal_dates","startDate":"2024-01-01",
                "endDate":"2024-12-31","frequency":"custom","anchorMonth":0}"#,
            &config,
            today(),
        )
        .unwrap_err();
        assert_eq!(err.code, error::ErrorCode::InvalidAnchorMonth);

        let body: Value = serde_json::from_str(&error_body(&err, false)).unwrap();
        assert_eq!(body["error"]["code"], "INVALID_ANCHOR_MONTH");
        assert_eq!(body["error"]["message"], "Invalid anchor month 0: expected 1-12");
    }

    #[test]
    fn test_fallback_error_body_is_valid_json() {
        let message = "bad \u{1b}[31m \"quoted\" \\ line\nbreak";
        let body: Value = serde_json::from_str(&fallback_error_body(message)).unwrap();
        assert_eq!(body["error"]["code"], "INTERNAL");
        assert_eq!(body["error"]["message"], message);
    }
}
