//! Analysis parameters shared by every action: the date window, the
//! visualization and dataset selectors, and the backend tuning knobs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ChlmonError, Result};

/// Inclusive date range sent as `start` / `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalysisWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ChlmonError::InvalidWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse `YYYY-MM-DD` bounds
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date("start", start)?, parse_date("end", end)?)
    }

    /// The date used by the "nearest image" operations
    pub fn selected_date(&self) -> NaiveDate {
        self.start
    }
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| ChlmonError::ConfigInvalid {
        key: key.to_string(),
        reason: format!("Invalid date '{}': {}. Use YYYY-MM-DD", value, e),
    })
}

/// Visualization selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visualization {
    TrueColor,
    #[default]
    Ndvi,
    CiGreen,
    CiRedEdge,
}

impl Visualization {
    /// Wire value of `ci_type` for chlorophyll visualizations
    pub fn ci_type(&self) -> Option<&'static str> {
        match self {
            Visualization::CiGreen => Some("green"),
            Visualization::CiRedEdge => Some("rededge"),
            Visualization::TrueColor | Visualization::Ndvi => None,
        }
    }
}

impl FromStr for Visualization {
    type Err = ChlmonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "true_color" | "truecolor" | "rgb" => Ok(Visualization::TrueColor),
            "ndvi" => Ok(Visualization::Ndvi),
            "ci_green" | "ci" | "green" => Ok(Visualization::CiGreen),
            "ci_rededge" | "rededge" => Ok(Visualization::CiRedEdge),
            _ => Err(ChlmonError::ConfigInvalid {
                key: "viz".to_string(),
                reason: format!(
                    "Invalid visualization: {}. Use true_color, ndvi, ci_green, or ci_rededge",
                    s
                ),
            }),
        }
    }
}

/// Dataset selector; determines the sensor collection for NDVI tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Sensor {
    #[default]
    #[serde(rename = "S2")]
    Sentinel2,
    #[serde(rename = "L8")]
    Landsat8,
}

impl Sensor {
    /// Earth Engine collection identifier sent as `sensor`
    pub fn collection_id(&self) -> &'static str {
        match self {
            Sensor::Sentinel2 => "COPERNICUS/S2_SR",
            Sensor::Landsat8 => "LANDSAT/LC08/C02/T1_L2",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sensor::Sentinel2 => write!(f, "S2"),
            Sensor::Landsat8 => write!(f, "L8"),
        }
    }
}

impl FromStr for Sensor {
    type Err = ChlmonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "s2" | "sentinel2" | "sentinel-2" => Ok(Sensor::Sentinel2),
            "l8" | "landsat8" | "landsat-8" => Ok(Sensor::Landsat8),
            _ => Err(ChlmonError::ConfigInvalid {
                key: "dataset".to_string(),
                reason: format!("Invalid dataset: {}. Use S2 or L8", s),
            }),
        }
    }
}

/// Water and cloud masking parameters for chlorophyll requests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudMask {
    pub water_threshold: f64,
    pub use_cloudprob: bool,
    pub cloudprob_threshold: u8,
}

impl Default for CloudMask {
    fn default() -> Self {
        Self {
            water_threshold: 0.0,
            use_cloudprob: true,
            cloudprob_threshold: 65,
        }
    }
}

/// Histogram bin edges, sent as repeated `bins` query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBins(pub Vec<i32>);

impl Default for HistogramBins {
    fn default() -> Self {
        Self(vec![20, 30, 40, 50, 60, 70])
    }
}

impl HistogramBins {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.0.iter().map(|b| ("bins".to_string(), b.to_string())).collect()
    }
}

/// Export job options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub description: String,
    pub file_prefix: String,
    pub to_drive: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            description: "ci_selected_export".to_string(),
            file_prefix: "ci_selected".to_string(),
            to_drive: false,
        }
    }
}
