//! Layers command implementation

use crate::cli::LayersCommand;
use crate::interactive;
use crate::output::OutputWriter;
use crate::output_types::{LayerRow, LayersOutput};
use crate::workspace::{TerminalState, Workspace};
use anyhow::Result;
use chlmon_core::models::LayerId;

pub fn execute(command: LayersCommand, output: &OutputWriter) -> Result<()> {
    let workspace = Workspace::find()?;
    let mut state = workspace.load_state()?;

    match command {
        LayersCommand::List => {}
        LayersCommand::Toggle { id } => {
            let visible = state.layers.toggle_layer(LayerId(id))?;
            workspace.save_state(&state)?;
            if !output.is_json() {
                output.success(format!(
                    "Layer {} {}",
                    id,
                    if visible { "shown" } else { "hidden" }
                ));
            }
        }
        LayersCommand::Remove { id } => {
            let removed = state.layers.remove_layer(LayerId(id))?;
            workspace.save_state(&state)?;
            if !output.is_json() {
                output.success(format!("Removed layer {}: {}", id, removed.display_name));
            }
        }
        LayersCommand::Clear { yes } => {
            if state.layers.is_empty() {
                if !output.is_json() {
                    output.info("No layers to clear");
                }
            } else {
                if !yes && !output.is_json() {
                    let prompt = format!("Remove all {} layers?", state.layers.len());
                    if !interactive::confirm(&prompt)? {
                        output.info("Cancelled");
                        return Ok(());
                    }
                }
                let cleared = state.layers.clear_layers();
                workspace.save_state(&state)?;
                if !output.is_json() {
                    output.success(format!("Cleared {} layers", cleared));
                }
            }
        }
    }

    print_layers(&state, output)
}

pub fn print_layers(state: &TerminalState, output: &OutputWriter) -> Result<()> {
    if output.is_json() {
        return output.result(LayersOutput { layers: state.layers.list_view().to_vec() });
    }

    output.section("Layers");
    output.table(state.layers.list_view().iter().map(LayerRow::from).collect());
    Ok(())
}
