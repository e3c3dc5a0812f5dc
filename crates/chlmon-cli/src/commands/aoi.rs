//! AOI command implementation

use crate::cli::{AoiCommand, AoiSetArgs};
use crate::output::OutputWriter;
use crate::output_types::AoiOutput;
use crate::workspace::Workspace;
use anyhow::{anyhow, Context, Result};
use chlmon_core::models::{AoiSummary, AreaOfInterest, Geometry};
use std::fs;

pub fn execute(command: AoiCommand, output: &OutputWriter) -> Result<()> {
    let workspace = Workspace::find()?;

    match command {
        AoiCommand::Set(args) => {
            let geometry = read_geometry(&args)?;
            let mut state = workspace.load_state()?;
            let message = state.aoi.on_geometry_created(geometry.clone());
            state.set_status(message);
            workspace.save_state(&state)?;

            if output.is_json() {
                output.result(AoiOutput { geojson: geometry.to_geojson(), summary: geometry.summary() })?;
            } else {
                output.success(message);
                print_summary(&geometry.summary(), output);
            }
        }
        AoiCommand::Show => {
            let state = workspace.load_state()?;
            let Some(geometry) = state.current_aoi() else {
                if output.is_json() {
                    output.result(serde_json::Value::Null)?;
                } else {
                    output.info("No AOI captured. Set one with 'chlmon aoi set'");
                }
                return Ok(());
            };

            if output.is_json() {
                output.result(AoiOutput { geojson: geometry.to_geojson(), summary: geometry.summary() })?;
            } else {
                print_summary(&geometry.summary(), output);
                output.section("GeoJSON");
                println!("{}", geometry.to_geojson());
            }
        }
    }

    Ok(())
}

fn read_geometry(args: &AoiSetArgs) -> Result<AreaOfInterest> {
    if let Some(path) = &args.file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(Geometry::from_geojson_str(&content)?);
    }
    if let Some(inline) = &args.geojson {
        return Ok(Geometry::from_geojson_str(inline)?);
    }
    if let Some(bbox) = &args.bbox {
        return Ok(Geometry::from_bbox_str(bbox)?);
    }
    Err(anyhow!("Provide one of --file, --geojson or --bbox"))
}

pub fn print_summary(summary: &AoiSummary, output: &OutputWriter) {
    output.section("Area of Interest");
    output.kv("Type", format!("{:?}", summary.geometry_type));
    if let Some([min_x, min_y, max_x, max_y]) = summary.bbox {
        output.kv("Extent", format!("{:.4}, {:.4} → {:.4}, {:.4}", min_x, min_y, max_x, max_y));
    }
    if let Some([x, y]) = summary.centroid {
        output.kv("Centroid", format!("{:.4}, {:.4}", x, y));
    }
    output.kv("Area", format!("{:.2} km²", summary.area_km2));
}
