//! Chlorophyll Monitor Core - Domain models, state coordination, and configuration
//!
//! This crate holds the area-of-interest capture, the overlay layer registry,
//! the chart renderer, the session store, and the port traits that the HTTP
//! and front-end adapters implement.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;
pub mod state;

pub use error::{ChlmonError, Result};
