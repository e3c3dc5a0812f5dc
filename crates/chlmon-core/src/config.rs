use crate::error::{ChlmonError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Redirect target registered for the Earth Engine OAuth client
pub const EE_REDIRECT_URI: &str =
    "https://harleybrotherthomas.github.io/gee-chlorophyll-monitor/oauth2callback";

/// Scopes requested by the Earth Engine OAuth flow
pub const EE_SCOPES: [&str; 4] = [
    "https://www.googleapis.com/auth/earthengine",
    "openid",
    "email",
    "profile",
];

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the monitor
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub api_base: ConfigValue<String>,
    pub google_client_id: ConfigValue<Option<String>>,
    pub ee_client_id: ConfigValue<Option<String>>,
    pub ee_project: ConfigValue<String>,
    pub request_timeout_secs: ConfigValue<Option<u64>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            api_base: ConfigValue::new("http://localhost:8000".to_string(), ConfigSource::Default),
            google_client_id: ConfigValue::new(None, ConfigSource::Default),
            ee_client_id: ConfigValue::new(None, ConfigSource::Default),
            ee_project: ConfigValue::new("earthengine-legacy".to_string(), ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ChlmonError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| ChlmonError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(api_base) = file_config.api_base {
            self.api_base.update(normalize_base(&api_base)?, ConfigSource::File);
        }

        if let Some(client_id) = file_config.google_client_id {
            self.google_client_id.update(Some(client_id), ConfigSource::File);
        }

        if let Some(client_id) = file_config.ee_client_id {
            self.ee_client_id.update(Some(client_id), ConfigSource::File);
        }

        if let Some(project) = file_config.ee_project {
            self.ee_project.update(project, ConfigSource::File);
        }

        if let Some(timeout) = file_config.request_timeout_secs {
            self.request_timeout_secs.update(Some(timeout), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // CHLMON_API_BASE
        if let Ok(base) = env::var("CHLMON_API_BASE") {
            match normalize_base(&base) {
                Ok(base) => self.api_base.update(base, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid CHLMON_API_BASE value '{}': expected an http(s) URL",
                    base
                ),
            }
        }

        // CHLMON_GOOGLE_CLIENT_ID
        if let Ok(client_id) = env::var("CHLMON_GOOGLE_CLIENT_ID") {
            self.google_client_id.update(Some(client_id), ConfigSource::Environment);
        }

        // CHLMON_EE_CLIENT_ID
        if let Ok(client_id) = env::var("CHLMON_EE_CLIENT_ID") {
            self.ee_client_id.update(Some(client_id), ConfigSource::Environment);
        }

        // CHLMON_EE_PROJECT
        if let Ok(project) = env::var("CHLMON_EE_PROJECT") {
            self.ee_project.update(project, ConfigSource::Environment);
        }

        // CHLMON_REQUEST_TIMEOUT
        if let Ok(timeout_str) = env::var("CHLMON_REQUEST_TIMEOUT") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => {
                    self.request_timeout_secs.update(Some(timeout), ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid CHLMON_REQUEST_TIMEOUT value '{}': expected whole seconds",
                    timeout_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) -> Result<()> {
        if let Some(api_base) = overrides.api_base {
            self.api_base.update(normalize_base(&api_base)?, ConfigSource::Cli);
        }

        if let Some(client_id) = overrides.ee_client_id {
            self.ee_client_id.update(Some(client_id), ConfigSource::Cli);
        }

        if let Some(project) = overrides.ee_project {
            self.ee_project.update(project, ConfigSource::Cli);
        }

        Ok(())
    }

    /// Earth Engine OAuth client id, required by the legacy sign-in
    pub fn require_ee_client_id(&self) -> Result<&str> {
        self.ee_client_id.value.as_deref().ok_or_else(|| ChlmonError::ConfigMissing {
            key: "ee_client_id".to_string(),
        })
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        fn optional(value: &Option<String>) -> String {
            value.clone().unwrap_or_else(|| "(unset)".to_string())
        }

        let mut map = HashMap::new();

        map.insert("api_base".to_string(), (self.api_base.value.clone(), self.api_base.source));

        map.insert(
            "google_client_id".to_string(),
            (optional(&self.google_client_id.value), self.google_client_id.source),
        );

        map.insert(
            "ee_client_id".to_string(),
            (optional(&self.ee_client_id.value), self.ee_client_id.source),
        );

        map.insert("ee_project".to_string(), (self.ee_project.value.clone(), self.ee_project.source));

        map.insert(
            "request_timeout_secs".to_string(),
            (
                self.request_timeout_secs
                    .value
                    .map(|t| format!("{}s", t))
                    .unwrap_or_else(|| "none".to_string()),
                self.request_timeout_secs.source,
            ),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    api_base: Option<String>,
    google_client_id: Option<String>,
    ee_client_id: Option<String>,
    ee_project: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub api_base: Option<String>,
    pub ee_client_id: Option<String>,
    pub ee_project: Option<String>,
}

/// Validate an API base URL and strip trailing slashes so paths can be
/// appended directly
pub fn normalize_base(s: &str) -> Result<String> {
    let trimmed = s.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ChlmonError::ConfigInvalid {
            key: "api_base".to_string(),
            reason: format!("Invalid API base: {}. Use an http:// or https:// URL", s),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.api_base.value, "http://localhost:8000");
        assert_eq!(config.api_base.source, ConfigSource::Default);
        assert!(config.google_client_id.value.is_none());
        assert_eq!(config.ee_project.value, "earthengine-legacy");
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);

        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);

        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_base = "https://ci-api.example.org/"
google_client_id = "123.apps.googleusercontent.com"
request_timeout_secs = 30
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.api_base.value, "https://ci-api.example.org");
        assert_eq!(config.api_base.source, ConfigSource::File);
        assert_eq!(
            config.google_client_id.value.as_deref(),
            Some("123.apps.googleusercontent.com")
        );
        assert_eq!(config.request_timeout_secs.value, Some(30));
        assert_eq!(config.ee_project.source, ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();
        config
            .update_from_cli(CliConfigOverrides {
                api_base: Some("http://127.0.0.1:9000".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.api_base.value, "http://127.0.0.1:9000");
        assert_eq!(config.api_base.source, ConfigSource::Cli);
        assert_eq!(config.ee_client_id.source, ConfigSource::Default);
    }

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("https://a.b/api/").unwrap(), "https://a.b/api");
        assert!(normalize_base("ftp://a.b").is_err());
    }

    #[test]
    fn test_require_ee_client_id() {
        let config = LayeredConfig::with_defaults();
        assert!(matches!(
            config.require_ee_client_id(),
            Err(ChlmonError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn test_inspection_map() {
        let map = LayeredConfig::with_defaults().to_inspection_map();
        assert!(map.contains_key("api_base"));
        assert!(map.contains_key("ee_project"));

        let (timeout, source) = &map["request_timeout_secs"];
        assert_eq!(timeout, "none");
        assert_eq!(*source, ConfigSource::Default);
    }
}
