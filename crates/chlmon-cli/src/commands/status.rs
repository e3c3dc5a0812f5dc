//! Status command implementation

use super::aoi::print_summary;
use super::layers::print_layers;
use crate::output::OutputWriter;
use crate::output_types::StatusOutput;
use crate::workspace::Workspace;
use anyhow::Result;
use chlmon_core::ports::SessionStore;

pub fn execute(output: &OutputWriter) -> Result<()> {
    let workspace = Workspace::find()?;
    let state = workspace.load_state()?;
    let session = workspace.sessions().load()?;

    if output.is_json() {
        return output.result(StatusOutput {
            workspace_path: workspace.root().display().to_string(),
            status: state.status().to_string(),
            aoi: state.current_aoi().map(|g| g.summary()),
            layers: state.layers.list_view().to_vec(),
            chart: state.chart.current().cloned(),
            signed_in_as: session.map(|s| s.email),
        });
    }

    output.section("Workspace Status");
    output.kv("Location", workspace.root().display());
    output.kv(
        "Session",
        session.map(|s| s.badge()).unwrap_or_else(|| "Not signed in".to_string()),
    );
    output.status(state.status_line());

    match state.current_aoi() {
        Some(geometry) => print_summary(&geometry.summary(), output),
        None => output.info("No AOI captured. Set one with 'chlmon aoi set'"),
    }

    print_layers(&state, output)?;

    if let Some(rendered) = state.chart.surface().rendered() {
        output.section("Chart");
        print!("{}", rendered);
    }

    Ok(())
}
