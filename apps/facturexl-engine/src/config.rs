//! Engine configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                     | Default | Meaning                              |
//! |------------------------------|---------|--------------------------------------|
//! | `FACTUREXL_LOG`              | `info`  | tracing filter (falls back to `RUST_LOG`) |
//! | `FACTUREXL_ALERT_LEAD_DAYS`  | `7`     | days before a renewal it is flagged  |
//! | `FACTUREXL_ALERT_GRACE_DAYS` | `30`    | overdue side of the alert window (see [`AlertWindow`]) |
//! | `FACTUREXL_STRICT_LINES`     | `false` | reject negative / out-of-range lines |
//! | `FACTUREXL_PRETTY_JSON`      | `false` | indent the JSON response             |

use facturexl_core::AlertWindow;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// tracing-subscriber filter directive
    pub log_filter: String,

    /// Window used by the renewal-approaching check
    pub alert_window: AlertWindow,

    /// Validate line items before computing totals
    pub strict_lines: bool,

    /// Pretty-print responses
    pub pretty_json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            log_filter: "info".to_string(),
            alert_window: AlertWindow::default(),
            strict_lines: false,
            pretty_json: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        EngineConfig::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();

        let config = EngineConfig {
            log_filter: lookup("FACTUREXL_LOG")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_filter),

            alert_window: AlertWindow {
                lead_days: parse_or(&lookup, "FACTUREXL_ALERT_LEAD_DAYS", defaults.alert_window.lead_days)?,
                grace_days: parse_or(&lookup, "FACTUREXL_ALERT_GRACE_DAYS", defaults.alert_window.grace_days)?,
            },

            strict_lines: parse_or(&lookup, "FACTUREXL_STRICT_LINES", defaults.strict_lines)?,

            pretty_json: parse_or(&lookup, "FACTUREXL_PRETTY_JSON", defaults.pretty_json)?,
        };

        if config.alert_window.lead_days < 0 {
            return Err(ConfigError::InvalidValue("FACTUREXL_ALERT_LEAD_DAYS".to_string()));
        }
        if config.alert_window.grace_days < 0 {
            return Err(ConfigError::InvalidValue("FACTUREXL_ALERT_GRACE_DAYS".to_string()));
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<EngineConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.alert_window.lead_days, 7);
        assert_eq!(config.alert_window.grace_days, 30);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("FACTUREXL_LOG", "debug"),
            ("FACTUREXL_ALERT_LEAD_DAYS", "14"),
            ("FACTUREXL_ALERT_GRACE_DAYS", " 0 "),
            ("FACTUREXL_STRICT_LINES", "true"),
            ("FACTUREXL_PRETTY_JSON", "true"),
        ])
        .unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.alert_window.lead_days, 14);
        assert_eq!(config.alert_window.grace_days, 0);
        assert!(config.strict_lines);
        assert!(config.pretty_json);
    }

    #[test]
    fn test_rust_log_fallback() {
        let config = load(&[("RUST_LOG", "warn")]).unwrap();
        assert_eq!(config.log_filter, "warn");

        let config = load(&[("RUST_LOG", "warn"), ("FACTUREXL_LOG", "trace")]).unwrap();
        assert_eq!(config.log_filter, "trace");
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("FACTUREXL_ALERT_LEAD_DAYS", "a week")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for FACTUREXL_ALERT_LEAD_DAYS");

        assert!(load(&[("FACTUREXL_ALERT_GRACE_DAYS", "-1")]).is_err());
        assert!(load(&[("FACTUREXL_STRICT_LINES", "yes")]).is_err());
    }
}
