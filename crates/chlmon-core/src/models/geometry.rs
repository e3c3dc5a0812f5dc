//! GeoJSON-compatible geometry used as the area of interest.
//!
//! The drawing surface hands over GeoJSON; the backend receives it unchanged
//! as the `aoi` field. Conversion to `geo` types only happens for display
//! summaries.

use geo::{BoundingRect, Centroid, ChamberlainDuquetteArea};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ChlmonError, Result};

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeometryType {
    #[default]
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

/// GeoJSON-compatible geometry representation
///
/// Maps directly to GeoJSON geometry objects, so serializing an AOI yields
/// the exact `{"type": ..., "coordinates": ...}` body the analysis API expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

/// The user-drawn geometry constraining every spatial query
pub type AreaOfInterest = Geometry;

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Create a closed rectangle ring, as a rectangle drawing tool emits it
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Geometry::polygon(vec![vec![
            [min_x, min_y],
            [min_x, max_y],
            [max_x, max_y],
            [max_x, min_y],
            [min_x, min_y],
        ]])
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Parse any GeoJSON document into a single geometry.
    ///
    /// Accepts a bare geometry, a Feature, or a FeatureCollection. For a
    /// collection the last feature with a geometry wins, matching the
    /// "latest drawing replaces the AOI" rule.
    pub fn from_geojson_str(input: &str) -> Result<Self> {
        let document = geojson::GeoJson::from_str(input)
            .map_err(|e| ChlmonError::InvalidGeometry(format!("Failed to parse GeoJSON: {}", e)))?;

        let geometry = match document {
            geojson::GeoJson::Geometry(geometry) => Some(geometry),
            geojson::GeoJson::Feature(feature) => feature.geometry,
            geojson::GeoJson::FeatureCollection(collection) => {
                collection.features.into_iter().rev().find_map(|f| f.geometry)
            }
        }
        .ok_or_else(|| ChlmonError::InvalidGeometry("GeoJSON contains no geometry".to_string()))?;

        let value = serde_json::to_value(&geometry)?;
        serde_json::from_value(value).map_err(|e| {
            ChlmonError::InvalidGeometry(format!("Unsupported geometry for an AOI: {}", e))
        })
    }

    /// Parse a `minx,miny,maxx,maxy` bounding box into a rectangle
    pub fn from_bbox_str(input: &str) -> Result<Self> {
        let parts: Vec<f64> = input
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| ChlmonError::InvalidGeometry(format!("Invalid bbox '{}': {}", input, e)))?;

        match parts.as_slice() {
            [min_x, min_y, max_x, max_y] => Ok(Self::rectangle(*min_x, *min_y, *max_x, *max_y)),
            _ => Err(ChlmonError::InvalidGeometry(format!(
                "Invalid bbox '{}': expected minx,miny,maxx,maxy",
                input
            ))),
        }
    }

    /// Summarize extent, centroid and area for display
    pub fn summary(&self) -> AoiSummary {
        let geometry = self.to_geo();
        let bbox = geometry
            .bounding_rect()
            .map(|r| [r.min().x, r.min().y, r.max().x, r.max().y]);
        let centroid = geometry.centroid().map(|p| [p.x(), p.y()]);
        let area_km2 = geometry.chamberlain_duquette_unsigned_area() / 1_000_000.0;

        AoiSummary {
            geometry_type: self.geometry_type(),
            bbox,
            centroid,
            area_km2,
        }
    }

    fn to_geo(&self) -> geo::Geometry<f64> {
        fn line(coords: &[[f64; 2]]) -> geo::LineString<f64> {
            coords.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect()
        }

        fn polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon<f64> {
            let mut rings = rings.iter();
            let exterior = rings.next().map(|r| line(r)).unwrap_or_else(|| line(&[]));
            geo::Polygon::new(exterior, rings.map(|r| line(r)).collect())
        }

        match self {
            Geometry::Point { coordinates } => {
                geo::Geometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
            }
            Geometry::LineString { coordinates } => geo::Geometry::LineString(line(coordinates)),
            Geometry::Polygon { coordinates } => geo::Geometry::Polygon(polygon(coordinates)),
            Geometry::MultiPoint { coordinates } => geo::Geometry::MultiPoint(
                coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect(),
            ),
            Geometry::MultiLineString { coordinates } => geo::Geometry::MultiLineString(
                geo::MultiLineString::new(coordinates.iter().map(|l| line(l)).collect()),
            ),
            Geometry::MultiPolygon { coordinates } => geo::Geometry::MultiPolygon(
                geo::MultiPolygon::new(coordinates.iter().map(|p| polygon(p)).collect()),
            ),
        }
    }
}

/// Display summary of an AOI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AoiSummary {
    pub geometry_type: GeometryType,
    pub bbox: Option<[f64; 4]>,
    pub centroid: Option<[f64; 2]>,
    pub area_km2: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_serializes_as_geojson() {
        let polygon = Geometry::rectangle(-81.7, 30.2, -81.4, 30.5);
        let json = polygon.to_geojson();
        assert_eq!(json["type"], "Polygon");
        assert_eq!(json["coordinates"][0].as_array().unwrap().len(), 5);
        assert_eq!(json["coordinates"][0][0], serde_json::json!([-81.7, 30.2]));
    }

    #[test]
    fn test_from_geojson_feature() {
        let input = r#"{
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}
        }"#;
        let geometry = Geometry::from_geojson_str(input).unwrap();
        assert_eq!(geometry.geometry_type(), GeometryType::Polygon);
    }

    #[test]
    fn test_from_geojson_collection_takes_last_drawing() {
        let input = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [3, 4]}}
            ]
        }"#;
        let geometry = Geometry::from_geojson_str(input).unwrap();
        assert_eq!(geometry, Geometry::point(3.0, 4.0));
    }

    #[test]
    fn test_from_geojson_rejects_empty_collection() {
        let input = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(matches!(
            Geometry::from_geojson_str(input),
            Err(ChlmonError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_from_bbox_str() {
        let geometry = Geometry::from_bbox_str("-122.6, 37.0, -122.3, 37.3").unwrap();
        assert_eq!(geometry, Geometry::rectangle(-122.6, 37.0, -122.3, 37.3));
        assert!(Geometry::from_bbox_str("1,2,3").is_err());
        assert!(Geometry::from_bbox_str("a,b,c,d").is_err());
    }

    #[test]
    fn test_summary_extent_and_centroid() {
        let summary = Geometry::rectangle(0.0, 0.0, 2.0, 2.0).summary();
        assert_eq!(summary.bbox, Some([0.0, 0.0, 2.0, 2.0]));
        let centroid = summary.centroid.unwrap();
        assert!((centroid[0] - 1.0).abs() < 1e-9);
        assert!((centroid[1] - 1.0).abs() < 1e-9);
        assert!(summary.area_km2 > 0.0);
    }
}
