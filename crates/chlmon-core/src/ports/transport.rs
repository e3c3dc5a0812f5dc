use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

/// A JSON POST to the analysis API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Path relative to the API base, e.g. `/tiles/ndvi`
    pub path: String,
    /// Query parameters; repeated keys are allowed
    pub query: Vec<(String, String)>,
    pub body: serde_json::Value,
    /// Attach the stored bearer token, if any
    pub authenticated: bool,
}

impl ApiRequest {
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            body,
            authenticated: true,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Send without the bearer token
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Path plus encoded query string, for logs and messages
    pub fn display_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self.query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

/// Port for issuing requests against the analysis API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a single request. Non-2xx responses surface as
    /// `ChlmonError::Api` carrying the response body verbatim.
    async fn post(&self, request: &ApiRequest) -> Result<serde_json::Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post(&self, request: &ApiRequest) -> Result<serde_json::Value> {
        (**self).post(request).await
    }
}
