//! Application state coordinator
//!
//! One explicit state object owns the area of interest, the overlay registry,
//! the chart renderer, the request generations and the status line.

pub mod aoi;
pub mod app;
pub mod chart;
pub mod layers;
pub mod memory;
pub mod requests;
pub mod session;
pub mod snapshot;

pub use aoi::AoiCapture;
pub use app::AppState;
pub use chart::ChartRenderer;
pub use layers::LayerRegistry;
pub use memory::{MemoryChart, MemoryMap, MemorySessionStore};
pub use requests::{ActionKind, RequestTracker, Ticket};
pub use session::FileSessionStore;
pub use snapshot::WorkspaceSnapshot;
