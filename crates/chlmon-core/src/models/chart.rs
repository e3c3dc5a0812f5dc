//! Chart descriptions handed to a chart surface.

use serde::{Deserialize, Serialize};

/// Chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// A single-series chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub series_label: String,
    pub labels: Vec<String>,
    /// `None` marks a gap (a period with no valid value)
    pub values: Vec<Option<f64>>,
}

impl ChartSpec {
    pub fn line(
        title: impl Into<String>,
        series_label: impl Into<String>,
        points: Vec<(String, Option<f64>)>,
    ) -> Self {
        let (labels, values) = points.into_iter().unzip();
        Self {
            kind: ChartKind::Line,
            title: title.into(),
            series_label: series_label.into(),
            labels,
            values,
        }
    }

    pub fn bar(
        title: impl Into<String>,
        series_label: impl Into<String>,
        bars: Vec<(String, f64)>,
    ) -> Self {
        let (labels, values): (Vec<String>, Vec<f64>) = bars.into_iter().unzip();
        Self {
            kind: ChartKind::Bar,
            title: title.into(),
            series_label: series_label.into(),
            labels,
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// Build a bar chart from a `bucket -> count` histogram.
    ///
    /// Categories are ordered by ascending numeric bucket and labelled
    /// `Class <bucket>` with the bucket truncated to an integer. Keys that
    /// are not numbers are skipped.
    pub fn histogram(
        title: impl Into<String>,
        series_label: impl Into<String>,
        histogram: &serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        let mut buckets: Vec<(f64, f64)> = histogram
            .iter()
            .filter_map(|(key, count)| {
                let Ok(bucket) = key.trim().parse::<f64>() else {
                    tracing::warn!(bucket = %key, "Skipping non-numeric histogram bucket");
                    return None;
                };
                Some((bucket, count.as_f64().unwrap_or(0.0)))
            })
            .collect();
        buckets.sort_by(|a, b| a.0.total_cmp(&b.0));

        let bars = buckets
            .into_iter()
            .map(|(bucket, count)| (format!("Class {}", bucket.trunc() as i64), count))
            .collect();
        Self::bar(title, series_label, bars)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_histogram_orders_buckets_numerically() {
        let histogram = json!({"30": 12, "100": 1, "20": 5});
        let chart = ChartSpec::histogram(
            "CI Histogram • 2023-06-01",
            "Pixels",
            histogram.as_object().unwrap(),
        );

        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.labels, vec!["Class 20", "Class 30", "Class 100"]);
        assert_eq!(chart.values, vec![Some(5.0), Some(12.0), Some(1.0)]);
    }

    #[test]
    fn test_histogram_skips_non_numeric_buckets() {
        let histogram = json!({"20": 5, "other": 3});
        let chart = ChartSpec::histogram("t", "Pixels", histogram.as_object().unwrap());
        assert_eq!(chart.labels, vec!["Class 20"]);
    }

    #[test]
    fn test_histogram_labels_use_integer_bucket() {
        let histogram = json!({"20.0": 5, "35.5": 2, " 40 ": 1});
        let chart = ChartSpec::histogram("t", "Pixels", histogram.as_object().unwrap());
        assert_eq!(chart.labels, vec!["Class 20", "Class 35", "Class 40"]);
        assert_eq!(chart.values, vec![Some(5.0), Some(2.0), Some(1.0)]);
    }

    #[test]
    fn test_line_keeps_gaps() {
        let chart = ChartSpec::line(
            "NDVI (mean) by month",
            "NDVI",
            vec![("2023-01".to_string(), Some(0.4)), ("2023-02".to_string(), None)],
        );
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.values, vec![Some(0.4), None]);
        assert_eq!(chart.len(), 2);
    }
}
