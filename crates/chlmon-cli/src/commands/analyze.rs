//! Analysis commands: each runs one dashboard action against the API and
//! persists the resulting state, including the status line on failure.

use crate::cli::{AnalysisArgs, ExportArgs, StatsArgs};
use crate::chart_view::TerminalChart;
use crate::output::OutputWriter;
use crate::output_types::ActionOutput;
use crate::progress::with_spinner;
use crate::workspace::{TerminalState, Workspace};
use anyhow::Result;
use chlmon_client::{AnalysisParams, ApiClient, Dashboard, Outcome};
use chlmon_core::config::CliConfigOverrides;
use chlmon_core::models::{AnalysisWindow, ExportOptions, HistogramBins, LayerId};
use chlmon_core::state::MemoryMap;
use serde::Serialize;

type TerminalDashboard = Dashboard<ApiClient, MemoryMap, TerminalChart>;

struct Run {
    workspace: Workspace,
    dashboard: TerminalDashboard,
}

impl Run {
    fn open(overrides: CliConfigOverrides) -> Result<Self> {
        let workspace = Workspace::find()?;
        let config = workspace.load_config(overrides)?;
        let client = workspace.api_client(&config)?;
        let state = workspace.load_state()?;
        tracing::debug!(api_base = %client.base_url(), "Opened workspace");

        Ok(Self {
            workspace,
            dashboard: Dashboard::from_state(client, state),
        })
    }

    /// Persist state, then report the outcome
    fn finish<T: Serialize>(
        self,
        result: chlmon_core::Result<Outcome<T>>,
        output: &OutputWriter,
        report: impl FnOnce(&T, &TerminalState, &OutputWriter),
    ) -> Result<()> {
        let state = self.dashboard.into_state();
        self.workspace.save_state(&state)?;
        let outcome = result?;

        if output.is_json() {
            let superseded = matches!(outcome, Outcome::Superseded);
            return output.result(ActionOutput {
                status: state.status().to_string(),
                superseded,
                result: outcome.applied(),
            });
        }

        match outcome {
            Outcome::Applied(value) => report(&value, &state, output),
            Outcome::Superseded => output.warning("A newer request replaced this one"),
        }
        output.status(state.status_line());
        Ok(())
    }
}

fn params(args: &AnalysisArgs) -> Result<AnalysisParams> {
    let window = AnalysisWindow::parse(&args.start, &args.end)?;
    Ok(AnalysisParams::new(window, args.viz, args.dataset))
}

fn report_layer(id: LayerId, state: &TerminalState, output: &OutputWriter) {
    output.success(state.status());
    if let Some(layer) = state.layers.get(id) {
        output.kv(format!("Layer {}", id), &layer.display_name);
        output.kv("Tiles", &layer.renderable.url_template);
    }
}

fn report_chart(state: &TerminalState) {
    if let Some(rendered) = state.chart.surface().rendered() {
        println!();
        print!("{}", rendered);
    }
}

pub async fn load(args: AnalysisArgs, overrides: CliConfigOverrides, output: &OutputWriter) -> Result<()> {
    let params = params(&args)?;
    let run = Run::open(overrides)?;
    let result =
        with_spinner("Loading tiles…", output.is_json(), run.dashboard.load_tiles(&params)).await;
    run.finish(result, output, |id, state, output| report_layer(*id, state, output))
}

pub async fn add_by_date(
    args: AnalysisArgs,
    overrides: CliConfigOverrides,
    output: &OutputWriter,
) -> Result<()> {
    let params = params(&args)?;
    let run = Run::open(overrides)?;
    let result = with_spinner(
        "Loading nearest image tiles…",
        output.is_json(),
        run.dashboard.add_layer_by_date(&params),
    )
    .await;
    run.finish(result, output, |layer, state, output| report_layer(layer.id, state, output))
}

pub async fn ndvi(args: AnalysisArgs, overrides: CliConfigOverrides, output: &OutputWriter) -> Result<()> {
    let params = params(&args)?;
    let run = Run::open(overrides)?;
    let result =
        with_spinner("Calculating NDVI…", output.is_json(), run.dashboard.calculate_ndvi(&params))
            .await;
    run.finish(result, output, |id, state, output| report_layer(*id, state, output))
}

pub async fn time_series(
    args: AnalysisArgs,
    overrides: CliConfigOverrides,
    output: &OutputWriter,
) -> Result<()> {
    let params = params(&args)?;
    let run = Run::open(overrides)?;
    let result =
        with_spinner("Computing time series…", output.is_json(), run.dashboard.time_series(&params))
            .await;
    run.finish(result, output, |_, state, _| report_chart(state))
}

pub async fn statistics(args: StatsArgs, overrides: CliConfigOverrides, output: &OutputWriter) -> Result<()> {
    let params = params(&args.analysis)?;
    let bins = HistogramBins(args.bins);
    let run = Run::open(overrides)?;
    let result = with_spinner(
        "Computing statistics…",
        output.is_json(),
        run.dashboard.statistics(&params, &bins),
    )
    .await;
    run.finish(result, output, |_, state, _| report_chart(state))
}

pub async fn export(args: ExportArgs, overrides: CliConfigOverrides, output: &OutputWriter) -> Result<()> {
    let params = params(&args.analysis)?;
    let options = ExportOptions {
        description: args.description,
        file_prefix: args.file_prefix,
        to_drive: args.to_drive,
    };
    let run = Run::open(overrides)?;
    let result =
        with_spinner("Submitting export…", output.is_json(), run.dashboard.export(&params, &options))
            .await;
    run.finish(result, output, |ticket, _, output| {
        for line in ticket.notice().lines() {
            output.info(line);
        }
    })
}
