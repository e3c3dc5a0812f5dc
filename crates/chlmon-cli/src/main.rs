//! Chlorophyll Monitor CLI - terminal dashboard
//!
//! Drives the analysis API over a persisted workspace: the AOI, overlay
//! layers and the last chart survive between invocations in `.chlmon/`.

mod chart_view;
mod cli;
mod commands;
mod dry_run;
mod errors;
mod interactive;
mod output;
mod output_types;
mod progress;
mod workspace;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let json = cli.json;

    // Create async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            errors::from_anyhow(e.into()).display(json);
            return ExitCode::FAILURE;
        }
    };

    // Execute the command
    match runtime.block_on(commands::execute(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            errors::from_anyhow(e).display(json);
            ExitCode::FAILURE
        }
    }
}
