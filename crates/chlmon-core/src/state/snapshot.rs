use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ChlmonError, Result};
use crate::models::{AreaOfInterest, ChartSpec, OverlayLayer};

/// Persisted dashboard state between front-end sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(default)]
    pub aoi: Option<AreaOfInterest>,

    #[serde(default)]
    pub layers: Vec<OverlayLayer>,

    #[serde(default = "default_next_layer_id")]
    pub next_layer_id: u64,

    #[serde(default)]
    pub chart: Option<ChartSpec>,

    #[serde(default)]
    pub status: String,
}

fn default_next_layer_id() -> u64 {
    1
}

impl Default for WorkspaceSnapshot {
    fn default() -> Self {
        Self {
            aoi: None,
            layers: Vec::new(),
            next_layer_id: default_next_layer_id(),
            chart: None,
            status: String::new(),
        }
    }
}

impl WorkspaceSnapshot {
    /// Load a snapshot; a missing file yields the empty state
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ChlmonError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Geometry, LayerId, TileLayer};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = TempDir::new().unwrap();
        let snapshot = WorkspaceSnapshot::load(&dir.path().join("state.json")).unwrap();
        assert_eq!(snapshot, WorkspaceSnapshot::default());
        assert_eq!(snapshot.next_layer_id, 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let snapshot = WorkspaceSnapshot {
            aoi: Some(Geometry::rectangle(0.0, 0.0, 1.0, 1.0)),
            layers: vec![OverlayLayer {
                id: LayerId(4),
                display_name: "CI 2023-06-02".into(),
                renderable: TileLayer::analysis("https://t/{z}/{x}/{y}"),
                visible: false,
            }],
            next_layer_id: 5,
            chart: None,
            status: "Tiles added.".into(),
        };

        snapshot.save(&path).unwrap();
        assert_eq!(WorkspaceSnapshot::load(&path).unwrap(), snapshot);
    }
}
