use crate::models::AreaOfInterest;
use crate::ports::{ChartSurface, MapSurface};
use crate::state::{AoiCapture, ChartRenderer, LayerRegistry, RequestTracker, WorkspaceSnapshot};

/// Explicit application state owned by the dashboard controller
#[derive(Debug)]
pub struct AppState<M, C> {
    pub aoi: AoiCapture,
    pub layers: LayerRegistry<M>,
    pub chart: ChartRenderer<C>,
    pub requests: RequestTracker,
    status: String,
}

impl<M: MapSurface, C: ChartSurface> AppState<M, C> {
    pub fn new(map: M, chart: C) -> Self {
        Self {
            aoi: AoiCapture::new(),
            layers: LayerRegistry::new(map),
            chart: ChartRenderer::new(chart),
            requests: RequestTracker::new(),
            status: String::new(),
        }
    }

    /// Rebuild state from a snapshot onto fresh surfaces
    pub fn from_snapshot(map: M, chart: C, snapshot: WorkspaceSnapshot) -> Self {
        Self {
            aoi: AoiCapture::with_current(snapshot.aoi),
            layers: LayerRegistry::restore(map, snapshot.layers, snapshot.next_layer_id),
            chart: ChartRenderer::restore(chart, snapshot.chart),
            requests: RequestTracker::new(),
            status: snapshot.status,
        }
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            aoi: self.aoi.current().cloned(),
            layers: self.layers.entries().to_vec(),
            next_layer_id: self.layers.next_id(),
            chart: self.chart.current().cloned(),
            status: self.status.clone(),
        }
    }

    pub fn current_aoi(&self) -> Option<&AreaOfInterest> {
        self.aoi.current()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Status line as displayed, e.g. `Status: Tiles added.`
    pub fn status_line(&self) -> String {
        format!("Status: {}", self.status)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        tracing::debug!(status = %self.status, "Status updated");
    }
}
