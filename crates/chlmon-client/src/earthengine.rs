//! Legacy Earth Engine bootstrap.
//!
//! An implicit-grant OAuth sign-in against Google, followed by SDK
//! initialization and a two-step smoke test. This subsystem shares no state
//! with the dashboard.

use async_trait::async_trait;
use chlmon_core::config::{LayeredConfig, EE_REDIRECT_URI, EE_SCOPES};
use chlmon_core::error::{ChlmonError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const EE_API_BASE: &str = "https://earthengine.googleapis.com/v1";
const CALLBACK_SUFFIX: &str = "/oauth2callback";

/// Smoke-test region, as `[west, south, east, north]`
pub const SAMPLE_RECTANGLE: [f64; 4] = [-122.6, 37.0, -122.3, 37.3];
/// Smoke-test sample point, as `[lon, lat]`
pub const SAMPLE_POINT: [f64; 2] = [-122.45, 37.15];

/// Implicit-grant OAuth client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthSettings {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl OAuthSettings {
    /// Settings for the given client id with the fixed redirect and scopes
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: EE_REDIRECT_URI.to_string(),
            scopes: EE_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Ok(Self::new(config.require_ee_client_id()?))
    }

    /// URL the user visits to grant access; the token comes back in the
    /// redirect fragment
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            AUTHORIZATION_ENDPOINT,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "token"),
                ("scope", &self.scopes.join(" ")),
                ("state", state),
                ("include_granted_scopes", "true"),
            ],
        )
        .map_err(|e| ChlmonError::Sdk {
            stage: "OAuth".to_string(),
            reason: format!("Cannot build authorization URL: {}", e),
        })?;

        Ok(url.to_string())
    }
}

/// Access token obtained from the implicit grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthGrant {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
}

impl OAuthGrant {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            expires_in: None,
        }
    }
}

/// Whether a URL is the OAuth redirect target
pub fn is_oauth_callback(url: &str) -> bool {
    match reqwest::Url::parse(url) {
        Ok(parsed) => parsed.path().ends_with(CALLBACK_SUFFIX),
        Err(_) => false,
    }
}

/// Extract the grant from a redirect URL such as
/// `.../oauth2callback#access_token=ya29...&token_type=Bearer&expires_in=3599`
pub fn access_token_from_redirect(url: &str) -> Result<OAuthGrant> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ChlmonError::Sdk {
        stage: "OAuth".to_string(),
        reason: format!("Invalid redirect URL: {}", e),
    })?;

    let fragment = parsed.fragment().unwrap_or_default();
    let mut grant = OAuthGrant::bearer(String::new());
    let mut error = None;

    // The fragment uses query-string encoding
    let params = reqwest::Url::parse(&format!("http://fragment/?{}", fragment)).map_err(|e| {
        ChlmonError::Sdk {
            stage: "OAuth".to_string(),
            reason: format!("Invalid redirect fragment: {}", e),
        }
    })?;
    for (key, value) in params.query_pairs() {
        match key.as_ref() {
            "access_token" => grant.access_token = value.into_owned(),
            "token_type" => grant.token_type = value.into_owned(),
            "expires_in" => grant.expires_in = value.parse().ok(),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(ChlmonError::Sdk { stage: "OAuth".to_string(), reason: error });
    }
    if grant.access_token.is_empty() {
        return Err(ChlmonError::Sdk {
            stage: "OAuth".to_string(),
            reason: "Redirect URL carries no access_token".to_string(),
        });
    }
    Ok(grant)
}

/// Port over the Earth Engine SDK
#[async_trait]
pub trait EarthEngineSdk: Send + Sync {
    /// Run the implicit-grant flow and return the access token
    async fn authenticate(&self, settings: &OAuthSettings) -> Result<OAuthGrant>;

    /// Initialize the client with the grant
    async fn initialize(&self, grant: &OAuthGrant) -> Result<()>;

    /// List the asset roots visible to the signed-in user
    async fn asset_roots(&self) -> Result<Vec<String>>;

    /// Mean of a random image over the sample rectangle at the sample point
    async fn sample_mean(&self) -> Result<serde_json::Value>;

    /// Forget any stored OAuth session
    fn clear_session(&self) -> Result<()>;
}

/// Obtains the redirect URL (or a bare access token) for an authorization URL
pub type TokenPrompt = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// Earth Engine REST API client
pub struct RestEarthEngine {
    client: reqwest::Client,
    base_url: String,
    project: String,
    prompt: TokenPrompt,
    grant: RwLock<Option<OAuthGrant>>,
    session_path: Option<PathBuf>,
}

impl RestEarthEngine {
    pub fn new(project: impl Into<String>, prompt: TokenPrompt) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: EE_API_BASE.to_string(),
            project: project.into(),
            prompt,
            grant: RwLock::new(None),
            session_path: None,
        }
    }

    /// Persist the grant to `path` after a successful initialization
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = Some(path.into());
        self
    }

    fn token(&self) -> Result<String> {
        let grant = self.grant.read().unwrap_or_else(PoisonError::into_inner);
        grant.as_ref().map(|g| g.access_token.clone()).ok_or_else(|| ChlmonError::Sdk {
            stage: "Earth Engine".to_string(),
            reason: "Not initialized".to_string(),
        })
    }

    async fn send(&self, builder: reqwest::RequestBuilder, stage: &str) -> Result<serde_json::Value> {
        let sdk_error = |reason: String| ChlmonError::Sdk { stage: stage.to_string(), reason };

        let response = builder.send().await.map_err(|e| sdk_error(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(sdk_error(format!("HTTP {}: {}", status.as_u16(), body)));
        }
        response.json().await.map_err(|e| sdk_error(e.to_string()))
    }
}

#[async_trait]
impl EarthEngineSdk for RestEarthEngine {
    async fn authenticate(&self, settings: &OAuthSettings) -> Result<OAuthGrant> {
        let url = settings.authorization_url("chlmon")?;
        let answer = (self.prompt)(&url)?;
        let answer = answer.trim();

        if answer.contains("access_token=") {
            access_token_from_redirect(answer)
        } else if answer.is_empty() {
            Err(ChlmonError::Sdk {
                stage: "OAuth".to_string(),
                reason: "No access token provided".to_string(),
            })
        } else {
            Ok(OAuthGrant::bearer(answer))
        }
    }

    async fn initialize(&self, grant: &OAuthGrant) -> Result<()> {
        let url = format!("{}/projects/{}/algorithms", self.base_url, self.project);
        self.send(self.client.get(url).bearer_auth(&grant.access_token), "Earth Engine init")
            .await?;

        *self.grant.write().unwrap_or_else(PoisonError::into_inner) = Some(grant.clone());
        if let Some(path) = &self.session_path {
            fs::write(path, serde_json::to_string_pretty(grant)?)?;
        }
        tracing::info!(project = %self.project, "Earth Engine initialized");
        Ok(())
    }

    async fn asset_roots(&self) -> Result<Vec<String>> {
        let url = format!("{}/projects/{}:listAssets", self.base_url, self.project);
        let value = self.send(self.client.get(url).bearer_auth(self.token()?), "Asset roots").await?;

        let roots = value["assets"]
            .as_array()
            .map(|assets| {
                assets
                    .iter()
                    .filter_map(|a| a["id"].as_str().or_else(|| a["name"].as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(roots)
    }

    async fn sample_mean(&self) -> Result<serde_json::Value> {
        let url = format!("{}/projects/{}/value:compute", self.base_url, self.project);
        let body = json!({ "expression": sample_mean_expression() });
        let value = self
            .send(self.client.post(url).bearer_auth(self.token()?).json(&body), "Sample compute")
            .await?;
        Ok(value.get("result").cloned().unwrap_or(value))
    }

    fn clear_session(&self) -> Result<()> {
        *self.grant.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(path) = &self.session_path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// Expression graph: `Image.random()` clipped to the sample rectangle and
/// reduced with a mean at the sample point (scale 1000, maxPixels 1e7)
fn sample_mean_expression() -> serde_json::Value {
    let [west, south, east, north] = SAMPLE_RECTANGLE;
    let [lon, lat] = SAMPLE_POINT;

    json!({
        "result": "0",
        "values": {
            "0": {
                "functionInvocationValue": {
                    "functionName": "Image.reduceRegion",
                    "arguments": {
                        "image": {
                            "functionInvocationValue": {
                                "functionName": "Image.clip",
                                "arguments": {
                                    "input": {
                                        "functionInvocationValue": {
                                            "functionName": "Image.random",
                                            "arguments": {}
                                        }
                                    },
                                    "geometry": {
                                        "functionInvocationValue": {
                                            "functionName": "GeometryConstructors.Rectangle",
                                            "arguments": {
                                                "coordinates": {
                                                    "constantValue": [west, south, east, north]
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        },
                        "reducer": {
                            "functionInvocationValue": {
                                "functionName": "Reducer.mean",
                                "arguments": {}
                            }
                        },
                        "geometry": {
                            "functionInvocationValue": {
                                "functionName": "GeometryConstructors.Point",
                                "arguments": {
                                    "coordinates": { "constantValue": [lon, lat] }
                                }
                            }
                        },
                        "scale": { "constantValue": 1000 },
                        "maxPixels": { "constantValue": 1e7 }
                    }
                }
            }
        }
    })
}

/// Outcome of the two independent smoke-test steps
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeReport {
    pub asset_roots: std::result::Result<Vec<String>, String>,
    pub sample_mean: std::result::Result<serde_json::Value, String>,
}

/// Sign-in/sign-out flow with a status line and a log view.
///
/// Sign-in is enabled exactly when sign-out is disabled.
pub struct LegacyBootstrap<S> {
    sdk: S,
    settings: OAuthSettings,
    status: String,
    signed_in: bool,
    log: Vec<String>,
}

impl<S: EarthEngineSdk> LegacyBootstrap<S> {
    pub fn new(sdk: S, settings: OAuthSettings) -> Self {
        Self {
            sdk,
            settings,
            status: "Signed out".to_string(),
            signed_in: false,
            log: Vec::new(),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    pub fn can_sign_in(&self) -> bool {
        !self.signed_in
    }

    pub fn can_sign_out(&self) -> bool {
        self.signed_in
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    /// Authenticate, initialize, then run the smoke test
    pub async fn sign_in(&mut self) -> Result<SmokeReport> {
        self.status = "Starting OAuth…".to_string();

        let grant = self.sdk.authenticate(&self.settings).await;
        let grant = grant.map_err(|e| self.fail("OAuth", e))?;

        self.status = "OAuth success. Initializing Earth Engine…".to_string();
        let initialized = self.sdk.initialize(&grant).await;
        initialized.map_err(|e| self.fail("Earth Engine init", e))?;

        self.status = "Earth Engine initialized".to_string();
        self.signed_in = true;
        self.record("Earth Engine initialized");

        Ok(self.smoke_test().await)
    }

    /// Each step reports on its own; a failure in one does not stop the other
    async fn smoke_test(&mut self) -> SmokeReport {
        let asset_roots = match self.sdk.asset_roots().await {
            Ok(roots) => {
                self.record(format!("Asset roots: {}", roots.join(", ")));
                Ok(roots)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Asset root listing failed");
                self.record(format!("Asset roots error: {}", e));
                Err(e.to_string())
            }
        };

        let sample_mean = match self.sdk.sample_mean().await {
            Ok(value) => {
                self.record(format!("Sample mean: {}", value));
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sample compute failed");
                self.record(format!("Sample compute error: {}", e));
                Err(e.to_string())
            }
        };

        SmokeReport { asset_roots, sample_mean }
    }

    pub fn sign_out(&mut self) -> Result<()> {
        self.status = "Signing out…".to_string();
        let cleared = self.sdk.clear_session();
        cleared.map_err(|e| self.fail("Sign-out", e))?;
        self.signed_in = false;
        self.status = "Signed out".to_string();
        self.record("Signed out. Session cleared.");
        Ok(())
    }

    /// Note when the current URL is the OAuth redirect target
    pub fn detect_redirect(&mut self, url: &str) -> bool {
        if !is_oauth_callback(url) {
            return false;
        }
        self.status = "OAuth callback reached…".to_string();
        true
    }

    /// Set the stage's failure status and leave the flow signed out.
    /// SDK errors already name their stage and pass through unchanged.
    fn fail(&mut self, stage: &str, err: ChlmonError) -> ChlmonError {
        let err = match err {
            ChlmonError::Sdk { .. } => err,
            other => ChlmonError::Sdk { stage: stage.to_string(), reason: other.to_string() },
        };
        tracing::error!(stage, error = %err, "Earth Engine step failed");
        self.status = format!("{} failed", stage);
        self.signed_in = false;
        self.record(err.to_string());
        err
    }

    fn record(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }
}
