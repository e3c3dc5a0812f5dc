pub mod analysis;
pub mod chart;
pub mod geometry;
pub mod layer;
pub mod session;

pub use analysis::{
    AnalysisWindow, CloudMask, ExportOptions, HistogramBins, Sensor, Visualization,
};
pub use chart::{ChartKind, ChartSpec};
pub use geometry::{AoiSummary, AreaOfInterest, Geometry, GeometryType};
pub use layer::{LayerId, LayerListItem, OverlayLayer, TileLayer};
pub use session::Session;
