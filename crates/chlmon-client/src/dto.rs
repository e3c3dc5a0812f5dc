//! Wire types for the analysis API.
//!
//! Request bodies borrow from the caller; responses are decoded leniently so
//! a missing `features` or `histogram` field reads as empty.

use chlmon_core::models::{CloudMask, ExportOptions, Geometry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of `/tiles/ndvi`
#[derive(Debug, Serialize)]
pub struct NdviTilesBody<'a> {
    pub aoi: &'a Geometry,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub sensor: &'a str,
}

/// Body of `/tiles/ci_composite` and `/stats/ci_timeseries_aoi`
#[derive(Debug, Serialize)]
pub struct CiAnalysisBody<'a> {
    pub aoi: &'a Geometry,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ci_type: &'a str,
    #[serde(flatten)]
    pub mask: CloudMask,
}

/// Body of `/tiles/ci_by_date`
#[derive(Debug, Serialize)]
pub struct CiByDateBody<'a> {
    pub aoi: &'a Geometry,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ci_type: &'a str,
    pub date: NaiveDate,
}

/// Body of `/stats/ndvi_timeseries`
#[derive(Debug, Serialize)]
pub struct WindowBody<'a> {
    pub aoi: &'a Geometry,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Body of `/stats/ci_histogram_by_date`
#[derive(Debug, Serialize)]
pub struct HistogramBody<'a> {
    pub aoi: &'a Geometry,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ci_type: &'a str,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub mask: CloudMask,
}

/// Body of `/export/ci_selected`
#[derive(Debug, Serialize)]
pub struct ExportBody<'a> {
    pub aoi: &'a Geometry,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ci_type: &'a str,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub options: &'a ExportOptions,
}

/// Body of `/auth/google`
#[derive(Debug, Serialize)]
pub struct IdentityBody<'a> {
    pub id_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileResponse {
    pub tile_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedTileResponse {
    pub tile_url: String,
    pub resolved_date: String,
}

#[derive(Debug, Deserialize)]
pub struct SeriesResponse {
    #[serde(default)]
    pub features: Vec<SeriesFeature>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesFeature {
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl SeriesResponse {
    /// Extract `(period, value)` pairs; a missing or non-numeric value
    /// becomes a gap
    pub fn points(&self, value_key: &str) -> Vec<(String, Option<f64>)> {
        self.features
            .iter()
            .map(|feature| {
                let period = match feature.properties.get("period") {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(serde_json::Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                let value = feature.properties.get(value_key).and_then(|v| v.as_f64());
                (period, value)
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramResponse {
    #[serde(default)]
    pub histogram: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub resolved_date: String,
}

/// Acknowledgement of a submitted export job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTicket {
    pub task_id: String,
    pub resolved_date: String,
    pub state: String,
}

impl ExportTicket {
    /// Multi-line notice shown to the user
    pub fn notice(&self) -> String {
        format!(
            "Export started.\nTask: {}\nDate: {}\nState: {}",
            self.task_id, self.resolved_date, self.state
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub app_token: String,
    pub user: IdentityUser,
}

#[derive(Debug, Deserialize)]
pub struct IdentityUser {
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ci_body_flattens_cloud_mask() {
        let aoi = Geometry::rectangle(0.0, 0.0, 1.0, 1.0);
        let body = CiAnalysisBody {
            aoi: &aoi,
            start: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
            ci_type: "green",
            mask: CloudMask::default(),
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["start"], "2023-06-01");
        assert_eq!(value["ci_type"], "green");
        assert_eq!(value["water_threshold"], 0.0);
        assert_eq!(value["use_cloudprob"], true);
        assert_eq!(value["cloudprob_threshold"], 65);
        assert_eq!(value["aoi"]["type"], "Polygon");
    }

    #[test]
    fn test_export_body_fields() {
        let aoi = Geometry::point(0.0, 0.0);
        let options = ExportOptions::default();
        let date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let body = ExportBody {
            aoi: &aoi,
            start: date,
            end: date,
            ci_type: "green",
            date,
            options: &options,
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["description"], "ci_selected_export");
        assert_eq!(value["file_prefix"], "ci_selected");
        assert_eq!(value["to_drive"], false);
        assert_eq!(value["date"], "2023-06-01");
    }

    #[test]
    fn test_series_points_with_gaps() {
        let response: SeriesResponse = serde_json::from_value(json!({
            "features": [
                {"properties": {"period": "2023-01", "meanNDVI": 0.42}},
                {"properties": {"period": "2023-02", "meanNDVI": null}},
                {"properties": {"period": "2023-03"}}
            ]
        }))
        .unwrap();

        let points = response.points("meanNDVI");
        assert_eq!(points[0], ("2023-01".to_string(), Some(0.42)));
        assert_eq!(points[1], ("2023-02".to_string(), None));
        assert_eq!(points[2].1, None);
    }

    #[test]
    fn test_missing_collections_read_as_empty() {
        let series: SeriesResponse = serde_json::from_value(json!({})).unwrap();
        assert!(series.features.is_empty());

        let histogram: HistogramResponse = serde_json::from_value(json!({})).unwrap();
        assert!(histogram.histogram.is_empty());
    }

    #[test]
    fn test_export_ticket_notice() {
        let ticket: ExportTicket = serde_json::from_value(json!({
            "taskId": "ABC", "resolvedDate": "2023-06-02", "state": "READY"
        }))
        .unwrap();
        assert_eq!(ticket.notice(), "Export started.\nTask: ABC\nDate: 2023-06-02\nState: READY");
    }
}
