//! # FactureXL Engine Binary
//!
//! ```text
//! echo '{"command":"round","amount":"1237.5"}' | facturexl-engine
//! ```

use std::io::{self, Read, Write};
use std::process::ExitCode;

use facturexl_engine::config::EngineConfig;
use facturexl_engine::error::ApiError;
use facturexl_engine::{error_body, handle, init_tracing};
use tracing::{error, info};

fn main() -> ExitCode {
    let config = match EngineConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            let err = ApiError::from(e);
            error!(%err, "Invalid configuration");
            return respond(Err(err), false);
        }
    };

    init_tracing(&config.log_filter);
    info!(
        lead_days = config.alert_window.lead_days,
        grace_days = config.alert_window.grace_days,
        strict_lines = config.strict_lines,
        "Configuration loaded"
    );

    let today = chrono::Local::now().date_naive();
    let result = read_request().and_then(|input| handle(&input, &config, today));

    if let Err(ref err) = result {
        error!(%err, "Request failed");
    }

    respond(result, config.pretty_json)
}

fn read_request() -> Result<String, ApiError> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn respond(result: Result<String, ApiError>, pretty: bool) -> ExitCode {
    let (body, code) = match result {
        Ok(body) => (body, ExitCode::SUCCESS),
        Err(err) => (error_body(&err, pretty), ExitCode::FAILURE),
    };

    let mut stdout = io::stdout().lock();
    if writeln!(stdout, "{}", body).and_then(|_| stdout.flush()).is_err() {
        return ExitCode::FAILURE;
    }
    code
}
