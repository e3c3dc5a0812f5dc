//! Chlorophyll Monitor Client - HTTP adapter and action handlers
//!
//! This crate implements the transport port over reqwest, the dashboard
//! controller that routes analysis responses into the state coordinator,
//! the identity exchange for the analysis API, and the Earth Engine OAuth
//! bootstrap.

pub mod dashboard;
pub mod dto;
pub mod earthengine;
pub mod http;
pub mod identity;

// Re-export main types
pub use dashboard::{AnalysisParams, Dashboard, DatedLayer, Outcome};
pub use dto::ExportTicket;
pub use earthengine::{EarthEngineSdk, LegacyBootstrap, OAuthSettings, RestEarthEngine};
pub use http::ApiClient;
pub use identity::IdentityExchange;
