use std::process::ExitCode;

use station_matcher::config::RunConfig;
use station_matcher::run::run;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();

    let config = match RunConfig::from_env(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "could not load config");
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(summary) => {
            info!(output = %summary.output.display(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}
