use chlmon_core::models::{Sensor, Visualization};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// chlmon - Chlorophyll and vegetation index monitor
#[derive(Parser, Debug)]
#[command(name = "chlmon")]
#[command(about = "Chlorophyll and vegetation index monitor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Analysis API base URL (overrides config and CHLMON_API_BASE)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new monitor workspace
    Init(InitArgs),

    /// Show workspace status: AOI, layers, chart and session
    Status,

    /// Show effective configuration and where each value comes from
    Config,

    /// Capture or inspect the area of interest
    #[command(subcommand)]
    Aoi(AoiCommand),

    /// Manage overlay layers
    #[command(subcommand)]
    Layers(LayersCommand),

    /// Load composite tiles for the selected visualization
    Load(AnalysisArgs),

    /// Add the chlorophyll image nearest to the start date as a layer
    AddByDate(AnalysisArgs),

    /// Add an NDVI composite layer
    Ndvi(AnalysisArgs),

    /// Chart a monthly time series over the AOI
    Timeseries(AnalysisArgs),

    /// Chart a chlorophyll histogram for the image nearest to the start date
    Stats(StatsArgs),

    /// Submit an export job for the image nearest to the start date
    Export(ExportArgs),

    /// Sign in to the analysis API
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Legacy Earth Engine sign-in and smoke test
    #[command(subcommand)]
    Ee(EeCommand),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Workspace directory path (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Force overwrite if workspace already exists
    #[arg(long)]
    pub force: bool,

    /// Show planned actions without executing them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum AoiCommand {
    /// Replace the AOI with a new geometry
    Set(AoiSetArgs),

    /// Show the current AOI
    Show,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct AoiSetArgs {
    /// GeoJSON file (geometry, Feature or FeatureCollection)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Inline GeoJSON
    /// Example: --geojson '{"type":"Point","coordinates":[-122.4,37.1]}'
    #[arg(long)]
    pub geojson: Option<String>,

    /// Rectangle as minx,miny,maxx,maxy
    /// Example: --bbox=-122.6,37.0,-122.3,37.3
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum LayersCommand {
    /// List overlay layers
    List,

    /// Show or hide a layer
    Toggle {
        /// Layer id as shown by `layers list`
        id: u64,
    },

    /// Remove a layer
    Remove {
        /// Layer id as shown by `layers list`
        id: u64,
    },

    /// Remove every layer
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Selector values shared by the analysis commands
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// Visualization: true_color, ndvi, ci_green or ci_rededge
    #[arg(long, default_value = "ndvi")]
    pub viz: Visualization,

    /// Dataset: S2 (Sentinel-2) or L8 (Landsat 8)
    #[arg(long, default_value = "S2")]
    pub dataset: Sensor,

    /// Window start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// Window end date (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Histogram bin edges
    #[arg(long, value_delimiter = ',', default_value = "20,30,40,50,60,70")]
    pub bins: Vec<i32>,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Export task description
    #[arg(long, default_value = "ci_selected_export")]
    pub description: String,

    /// Output file prefix
    #[arg(long, default_value = "ci_selected")]
    pub file_prefix: String,

    /// Export to Google Drive instead of Cloud Storage
    #[arg(long)]
    pub to_drive: bool,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Exchange a Google ID token for an API session
    Signin {
        /// Google ID token (prompted when omitted)
        #[arg(long)]
        id_token: Option<String>,
    },

    /// Show the signed-in user
    Whoami,

    /// Forget the stored session
    Forget,
}

#[derive(Subcommand, Debug)]
pub enum EeCommand {
    /// Authenticate, initialize Earth Engine and run the smoke test
    Signin {
        /// Access token or full redirect URL (prompted when omitted)
        #[arg(long)]
        access_token: Option<String>,

        /// Earth Engine OAuth client id (overrides config)
        #[arg(long)]
        client_id: Option<String>,

        /// Earth Engine project (overrides config)
        #[arg(long)]
        project: Option<String>,
    },

    /// Clear the stored Earth Engine session
    Signout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analysis_selectors() {
        let cli = Cli::parse_from([
            "chlmon", "load", "--viz", "ci_green", "--dataset", "L8", "--start", "2023-06-01",
            "--end", "2023-06-30",
        ]);
        let Commands::Load(args) = cli.command else {
            panic!("expected load");
        };
        assert_eq!(args.viz, Visualization::CiGreen);
        assert_eq!(args.dataset, Sensor::Landsat8);
    }

    #[test]
    fn test_parse_bins_list() {
        let cli = Cli::parse_from([
            "chlmon", "stats", "--start", "2023-06-01", "--end", "2023-06-30", "--bins", "10,20",
        ]);
        let Commands::Stats(args) = cli.command else {
            panic!("expected stats");
        };
        assert_eq!(args.bins, vec![10, 20]);
    }

    #[test]
    fn test_aoi_set_requires_one_source() {
        assert!(Cli::try_parse_from(["chlmon", "aoi", "set"]).is_err());
        assert!(Cli::try_parse_from(["chlmon", "aoi", "set", "--bbox=-1,-1,1,1"]).is_ok());
    }
}
