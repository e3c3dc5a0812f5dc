//! Action handlers for the dashboard.
//!
//! Each handler walks Idle → Validating → Requesting → {Success, Failed}:
//! it requires an AOI, issues exactly one request, and routes the response
//! into the layer registry or the chart renderer. State lives behind a
//! mutex that is never held across an `.await`, so handlers may overlap;
//! a response is applied only while its request is the latest of its kind.

use chlmon_core::error::{ChlmonError, Result};
use chlmon_core::models::{
    AnalysisWindow, AreaOfInterest, ChartSpec, ExportOptions, HistogramBins, LayerId,
    OverlayLayer, Sensor, TileLayer, Visualization,
};
use chlmon_core::ports::{ApiRequest, ChartSurface, MapSurface, Transport};
use chlmon_core::state::{ActionKind, AppState, Ticket};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::dto::{
    CiAnalysisBody, CiByDateBody, DatedTileResponse, ExportBody, ExportTicket, HistogramBody,
    HistogramResponse, NdviTilesBody, SeriesResponse, TileResponse, WindowBody,
};

const TRUE_COLOR_NOTICE: &str =
    "True Color demo uses basemap only. Choose NDVI or CI for analysis tiles.";
const BY_DATE_NOTICE: &str =
    "Add Layer (by date) wired for CI. Use Calculate NDVI for NDVI tiles.";

/// Selector values shared by every action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisParams {
    pub window: AnalysisWindow,
    pub visualization: Visualization,
    pub sensor: Sensor,
}

impl AnalysisParams {
    pub fn new(window: AnalysisWindow, visualization: Visualization, sensor: Sensor) -> Self {
        Self { window, visualization, sensor }
    }

    /// Overlay name, e.g. `NDVI • S2 • 2023-06-01→2023-06-30`
    pub fn layer_name(&self, prefix: &str) -> String {
        format!("{} • {} • {}→{}", prefix, self.sensor, self.window.start, self.window.end)
    }
}

/// Result of a request that completed successfully
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The response was routed into state
    Applied(T),
    /// A newer request of the same kind was issued; the response was dropped
    Superseded,
}

impl<T> Outcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Superseded => None,
        }
    }
}

/// A layer added for the image nearest to a requested date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedLayer {
    pub id: LayerId,
    pub resolved_date: String,
}

/// Dashboard controller owning the application state
pub struct Dashboard<T, M, C> {
    transport: T,
    state: Mutex<AppState<M, C>>,
}

impl<T, M, C> Dashboard<T, M, C>
where
    T: Transport,
    M: MapSurface,
    C: ChartSurface,
{
    pub fn new(transport: T, map: M, chart: C) -> Self {
        Self::from_state(transport, AppState::new(map, chart))
    }

    pub fn from_state(transport: T, state: AppState<M, C>) -> Self {
        Self { transport, state: Mutex::new(state) }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_state(self) -> AppState<M, C> {
        self.state.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read state under the lock
    pub fn with_state<R>(&self, f: impl FnOnce(&AppState<M, C>) -> R) -> R {
        f(&self.lock())
    }

    /// Drawing surface callback: the new geometry becomes the AOI
    pub fn capture_aoi(&self, geometry: AreaOfInterest) {
        let mut state = self.lock();
        let message = state.aoi.on_geometry_created(geometry);
        state.set_status(message);
    }

    pub fn toggle_layer(&self, id: LayerId) -> Result<bool> {
        self.lock().layers.toggle_layer(id)
    }

    pub fn remove_layer(&self, id: LayerId) -> Result<OverlayLayer> {
        self.lock().layers.remove_layer(id)
    }

    pub fn clear_layers(&self) -> usize {
        self.lock().layers.clear_layers()
    }

    /// Load composite tiles for the selected visualization
    pub async fn load_tiles(&self, params: &AnalysisParams) -> Result<Outcome<LayerId>> {
        let aoi = self.require_aoi()?;
        let window = params.window;

        let (request, prefix) = match params.visualization.ci_type() {
            None if params.visualization == Visualization::TrueColor => {
                return Err(ChlmonError::UnsupportedVisualization(TRUE_COLOR_NOTICE.to_string()));
            }
            None => {
                let body = NdviTilesBody {
                    aoi: &aoi,
                    start: window.start,
                    end: window.end,
                    sensor: params.sensor.collection_id(),
                };
                (ApiRequest::post("/tiles/ndvi", to_body(&body)?), "NDVI Composite")
            }
            Some(ci_type) => {
                let body = CiAnalysisBody {
                    aoi: &aoi,
                    start: window.start,
                    end: window.end,
                    ci_type,
                    mask: Default::default(),
                };
                (ApiRequest::post("/tiles/ci_composite", to_body(&body)?), "CI Composite")
            }
        };

        let ticket = self.begin(ActionKind::LoadTiles, "Loading tiles…");
        let response: TileResponse = self.execute(&ticket, &request).await?;
        let name = params.layer_name(prefix);

        Ok(self.apply(&ticket, |state| {
            let id = state.layers.add_layer(name, TileLayer::analysis(response.tile_url));
            state.set_status("Tiles added.");
            id
        }))
    }

    /// Add the chlorophyll image nearest to the window start as a layer
    pub async fn add_layer_by_date(&self, params: &AnalysisParams) -> Result<Outcome<DatedLayer>> {
        let aoi = self.require_aoi()?;
        let Some(ci_type) = params.visualization.ci_type() else {
            return Err(ChlmonError::UnsupportedVisualization(BY_DATE_NOTICE.to_string()));
        };

        let body = CiByDateBody {
            aoi: &aoi,
            start: params.window.start,
            end: params.window.end,
            ci_type,
            date: params.window.selected_date(),
        };
        let request = ApiRequest::post("/tiles/ci_by_date", to_body(&body)?);

        let ticket = self.begin(ActionKind::AddLayerByDate, "Loading nearest image tiles…");
        let response: DatedTileResponse = self.execute(&ticket, &request).await?;

        Ok(self.apply(&ticket, |state| {
            let id = state.layers.add_layer(
                format!("CI {}", response.resolved_date),
                TileLayer::analysis(response.tile_url),
            );
            state.set_status(format!("CI by date added: {}", response.resolved_date));
            DatedLayer { id, resolved_date: response.resolved_date }
        }))
    }

    /// Compute an NDVI composite layer regardless of the visualization selector
    pub async fn calculate_ndvi(&self, params: &AnalysisParams) -> Result<Outcome<LayerId>> {
        let aoi = self.require_aoi()?;
        let body = NdviTilesBody {
            aoi: &aoi,
            start: params.window.start,
            end: params.window.end,
            sensor: params.sensor.collection_id(),
        };
        let request = ApiRequest::post("/tiles/ndvi", to_body(&body)?);

        let ticket = self.begin(ActionKind::CalculateNdvi, "Calculating NDVI…");
        let response: TileResponse = self.execute(&ticket, &request).await?;
        let name = params.layer_name("NDVI");

        Ok(self.apply(&ticket, |state| {
            let id = state.layers.add_layer(name, TileLayer::analysis(response.tile_url));
            state.set_status("NDVI layer added.");
            id
        }))
    }

    /// Monthly series: median CI for chlorophyll visualizations, mean NDVI
    /// otherwise
    pub async fn time_series(&self, params: &AnalysisParams) -> Result<Outcome<ChartSpec>> {
        let aoi = self.require_aoi()?;
        let window = params.window;

        let (request, value_key, title, series) = match params.visualization.ci_type() {
            Some(ci_type) => {
                let body = CiAnalysisBody {
                    aoi: &aoi,
                    start: window.start,
                    end: window.end,
                    ci_type,
                    mask: Default::default(),
                };
                (
                    ApiRequest::post("/stats/ci_timeseries_aoi", to_body(&body)?),
                    "medianCI",
                    "CI (median) by month",
                    "CI",
                )
            }
            None => {
                let body = WindowBody { aoi: &aoi, start: window.start, end: window.end };
                (
                    ApiRequest::post("/stats/ndvi_timeseries", to_body(&body)?),
                    "meanNDVI",
                    "NDVI (mean) by month",
                    "NDVI",
                )
            }
        };
        let request = request.with_query("interval", "month");

        let ticket = self.begin(ActionKind::TimeSeries, "Computing time series…");
        let response: SeriesResponse = self.execute(&ticket, &request).await?;
        let chart = ChartSpec::line(title, series, response.points(value_key));

        Ok(self.apply(&ticket, |state| {
            state.chart.draw(chart.clone());
            state.set_status("Time series ready.");
            chart
        }))
    }

    /// Green CI histogram for the image nearest to the window start
    pub async fn statistics(
        &self,
        params: &AnalysisParams,
        bins: &HistogramBins,
    ) -> Result<Outcome<ChartSpec>> {
        let aoi = self.require_aoi()?;
        let body = HistogramBody {
            aoi: &aoi,
            start: params.window.start,
            end: params.window.end,
            ci_type: "green",
            date: params.window.selected_date(),
            mask: Default::default(),
        };
        let request = ApiRequest::post("/stats/ci_histogram_by_date", to_body(&body)?)
            .with_query_pairs(bins.query_pairs());

        let ticket = self.begin(ActionKind::Statistics, "Computing statistics…");
        let response: HistogramResponse = self.execute(&ticket, &request).await?;
        let chart = ChartSpec::histogram(
            format!("CI Histogram • {}", response.resolved_date),
            "Pixels",
            &response.histogram,
        );

        Ok(self.apply(&ticket, |state| {
            state.chart.draw(chart.clone());
            state.set_status("Statistics ready.");
            chart
        }))
    }

    /// Submit an export job for the green CI image nearest to the window start
    pub async fn export(
        &self,
        params: &AnalysisParams,
        options: &ExportOptions,
    ) -> Result<Outcome<ExportTicket>> {
        let aoi = self.require_aoi()?;
        let body = ExportBody {
            aoi: &aoi,
            start: params.window.start,
            end: params.window.end,
            ci_type: "green",
            date: params.window.selected_date(),
            options,
        };
        let request = ApiRequest::post("/export/ci_selected", to_body(&body)?);

        let ticket = self.begin(ActionKind::Export, "Submitting export…");
        let response: ExportTicket = self.execute(&ticket, &request).await?;

        Ok(self.apply(&ticket, |state| {
            tracing::info!(task_id = %response.task_id, state = %response.state, "Export started");
            state.set_status("Export started.");
            response
        }))
    }

    fn lock(&self) -> MutexGuard<'_, AppState<M, C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validating: every action needs an AOI before anything else happens
    fn require_aoi(&self) -> Result<AreaOfInterest> {
        self.lock().current_aoi().cloned().ok_or(ChlmonError::MissingAoi)
    }

    /// Requesting: take a ticket and show progress
    fn begin(&self, kind: ActionKind, status: &str) -> Ticket {
        let mut state = self.lock();
        state.set_status(status);
        state.requests.begin(kind)
    }

    /// Issue the request and decode the response. Failures are logged and
    /// shown on the status line while the request is still current.
    async fn execute<R: DeserializeOwned>(&self, ticket: &Ticket, request: &ApiRequest) -> Result<R> {
        tracing::debug!(
            action = %ticket.kind,
            generation = ticket.generation,
            path = %request.display_path(),
            "Issuing request"
        );

        let result = self.transport.post(request).await.and_then(|value| {
            serde_json::from_value(value).map_err(|e| ChlmonError::Decode {
                path: request.display_path(),
                reason: e.to_string(),
            })
        });

        result.map_err(|err| {
            tracing::error!(action = %ticket.kind, error = %err, "Request failed");
            let mut state = self.lock();
            if state.requests.is_current(ticket) {
                state.set_status(format!("Error: {}", err));
            }
            err
        })
    }

    /// Success: route the response into state unless it was superseded
    fn apply<R>(&self, ticket: &Ticket, f: impl FnOnce(&mut AppState<M, C>) -> R) -> Outcome<R> {
        let mut state = self.lock();
        if !state.requests.is_current(ticket) {
            tracing::debug!(
                action = %ticket.kind,
                generation = ticket.generation,
                "Discarding superseded response"
            );
            return Outcome::Superseded;
        }
        Outcome::Applied(f(&mut state))
    }
}

fn to_body<B: Serialize>(body: &B) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(body)?)
}
