use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable overlay identifier; never reused within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A templated image-tile source rendered as a map overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

impl TileLayer {
    /// Tile layer served by the analysis backend
    pub fn analysis(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            attribution: "GEE".to_string(),
        }
    }
}

/// Registry entry for an overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayLayer {
    pub id: LayerId,
    pub display_name: String,
    pub renderable: TileLayer,
    pub visible: bool,
}

/// One row of the rendered layer list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerListItem {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
}
