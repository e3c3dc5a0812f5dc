//! Error types for the chlorophyll monitor

use thiserror::Error;

use crate::models::LayerId;

#[derive(Debug, Error)]
pub enum ChlmonError {
    // Precondition errors
    #[error("Please draw an AOI on the map first.")]
    MissingAoi,

    #[error("{0}")]
    UnsupportedVisualization(String),

    #[error("Invalid analysis window: end {end} is before start {start}")]
    InvalidWindow { start: String, end: String },

    // Layer registry errors
    #[error("Layer not found: {id}")]
    UnknownLayer { id: LayerId },

    // Remote API errors
    /// Non-2xx response; the backend body is surfaced verbatim
    #[error("{body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response from {path}: {reason}")]
    Decode { path: String, reason: String },

    // Authentication errors
    #[error("Sign-in failed: {0}")]
    IdentityExchange(String),

    #[error("{stage} failed: {reason}")]
    Sdk { stage: String, reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Geometry input errors
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ChlmonError {
    /// Whether the error blocked an action before any request was issued
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ChlmonError::MissingAoi
                | ChlmonError::UnsupportedVisualization(_)
                | ChlmonError::InvalidWindow { .. }
        )
    }
}

impl From<serde_json::Error> for ChlmonError {
    fn from(err: serde_json::Error) -> Self {
        ChlmonError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChlmonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_surfaces_body_verbatim() {
        let err = ChlmonError::Api {
            status: 500,
            body: "{\"detail\":\"no images in range\"}".to_string(),
        };
        assert_eq!(err.to_string(), "{\"detail\":\"no images in range\"}");
    }

    #[test]
    fn test_precondition_classification() {
        assert!(ChlmonError::MissingAoi.is_precondition());
        assert!(!ChlmonError::Network("refused".into()).is_precondition());
    }
}
