//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod storage;
pub mod surface;
pub mod transport;

pub use storage::SessionStore;
pub use surface::{ChartSurface, MapSurface};
pub use transport::{ApiRequest, Transport};
