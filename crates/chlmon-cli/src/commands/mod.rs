//! Command implementations

mod analyze;
mod aoi;
mod auth;
mod config;
mod ee;
mod init;
mod layers;
mod status;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;
use chlmon_core::config::CliConfigOverrides;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let overrides = CliConfigOverrides {
        api_base: cli.api_base,
        ..Default::default()
    };

    match cli.command {
        Commands::Init(args) => init::execute(args, overrides, &output),
        Commands::Status => status::execute(&output),
        Commands::Config => config::execute(overrides, &output),
        Commands::Aoi(command) => aoi::execute(command, &output),
        Commands::Layers(command) => layers::execute(command, &output),
        Commands::Load(args) => analyze::load(args, overrides, &output).await,
        Commands::AddByDate(args) => analyze::add_by_date(args, overrides, &output).await,
        Commands::Ndvi(args) => analyze::ndvi(args, overrides, &output).await,
        Commands::Timeseries(args) => analyze::time_series(args, overrides, &output).await,
        Commands::Stats(args) => analyze::statistics(args, overrides, &output).await,
        Commands::Export(args) => analyze::export(args, overrides, &output).await,
        Commands::Auth(command) => auth::execute(command, overrides, &output).await,
        Commands::Ee(command) => ee::execute(command, overrides, &output).await,
    }
}
