//! Integration tests for the AOI / layer / chart state coordinator

use chlmon_core::models::{ChartSpec, Geometry, LayerId, TileLayer};
use chlmon_core::ports::MapSurface;
use chlmon_core::state::{AppState, MemoryChart, MemoryMap, WorkspaceSnapshot};
use tempfile::TempDir;

#[test]
fn test_state_survives_persistence() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let mut state = AppState::new(MemoryMap::new(), MemoryChart::new());
    state.aoi.on_geometry_created(Geometry::rectangle(-81.7, 30.2, -81.4, 30.5));
    let kept = state.layers.add_layer("CI 2023-06-02", TileLayer::analysis("https://a"));
    let hidden = state.layers.add_layer("NDVI", TileLayer::analysis("https://b"));
    let dropped = state.layers.add_layer("NDVI", TileLayer::analysis("https://c"));
    state.layers.toggle_layer(hidden).unwrap();
    state.layers.remove_layer(dropped).unwrap();
    state.snapshot().save(&path).unwrap();

    let snapshot = WorkspaceSnapshot::load(&path).unwrap();
    let mut restored = AppState::from_snapshot(MemoryMap::new(), MemoryChart::new(), snapshot);

    assert_eq!(restored.layers.len(), 2);
    assert_eq!(restored.layers.map().attached_url(kept), Some("https://a"));
    assert!(!restored.layers.map().is_attached(hidden));

    // Removed ids are never reused
    let next = restored.layers.add_layer("new", TileLayer::analysis("https://d"));
    assert_eq!(next, LayerId(4));
}

#[test]
fn test_chart_singleton_across_restore() {
    let mut state = AppState::new(MemoryMap::new(), MemoryChart::new());
    state.chart.draw(ChartSpec::line("NDVI (mean) by month", "NDVI", vec![]));

    let mut restored =
        AppState::from_snapshot(MemoryMap::new(), MemoryChart::new(), state.snapshot());
    restored
        .chart
        .draw(ChartSpec::bar("CI Histogram • 2023-06-01", "Pixels", vec![]));

    assert_eq!(restored.chart.surface().live_instances(), 1);
    assert_eq!(restored.chart.surface().destroys(), 1);
}
