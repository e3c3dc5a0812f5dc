use chlmon_core::models::{AoiSummary, ChartSpec, LayerListItem};
use serde::Serialize;
use tabled::Tabled;

/// Output for init command
#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub workspace_path: String,
    pub api_base: String,
    pub ee_project: String,
}

/// One row of `layers list`
#[derive(Debug, Serialize, Tabled)]
pub struct LayerRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Visible")]
    pub visible: String,
}

impl From<&LayerListItem> for LayerRow {
    fn from(item: &LayerListItem) -> Self {
        Self {
            id: item.id.0,
            name: item.name.clone(),
            visible: if item.visible { "✓" } else { "✗" }.to_string(),
        }
    }
}

/// Output for layers list
#[derive(Debug, Serialize)]
pub struct LayersOutput {
    pub layers: Vec<LayerListItem>,
}

/// One row of `config`
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

/// Output for aoi commands
#[derive(Debug, Serialize)]
pub struct AoiOutput {
    pub geojson: serde_json::Value,
    pub summary: AoiSummary,
}

/// Output for status command
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub workspace_path: String,
    pub status: String,
    pub aoi: Option<AoiSummary>,
    pub layers: Vec<LayerListItem>,
    pub chart: Option<ChartSpec>,
    pub signed_in_as: Option<String>,
}

/// Output for an analysis action
#[derive(Debug, Serialize)]
pub struct ActionOutput<T: Serialize> {
    pub status: String,
    pub superseded: bool,
    pub result: Option<T>,
}

/// Output for the Earth Engine smoke test
#[derive(Debug, Serialize)]
pub struct EeSigninOutput {
    pub status: String,
    pub asset_roots: Result<Vec<String>, String>,
    pub sample_mean: Result<serde_json::Value, String>,
    pub log: Vec<String>,
}
