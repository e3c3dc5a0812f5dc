use chlmon_core::error::ChlmonError;
use console::style;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    /// Print to stderr, as a JSON object when `json` is set
    pub fn display(&self, json: bool) {
        if json {
            let output = serde_json::json!({
                "status": "error",
                "message": self.message,
                "context": self.context,
                "suggestions": self.suggestions,
            });
            eprintln!("{}", output);
            return;
        }

        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for workspace not found
pub fn workspace_not_found() -> CliError {
    let current_dir = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    CliError::new("Not in a chlmon workspace")
        .with_context(format!(
            "You're not in a chlmon workspace directory.\n\nCurrent directory: {}\nLooking for: .chlmon directory",
            current_dir
        ))
        .with_suggestion("Initialize a workspace: chlmon init")
        .with_suggestion("Or navigate to an existing workspace")
        .with_help("Run: chlmon init --help")
}

/// Create error for workspace already initialized
pub fn workspace_exists(path: &str) -> CliError {
    CliError::new("Workspace already exists")
        .with_context(format!("A .chlmon directory already exists.\n\nPath: {}", path))
        .with_suggestion("Use --force to reinitialize (clears the AOI, layers and session)")
        .with_help("Run: chlmon init --help")
}

fn missing_aoi(message: String) -> CliError {
    CliError::new(message)
        .with_suggestion("Set a rectangle: chlmon aoi set --bbox=-122.6,37.0,-122.3,37.3")
        .with_suggestion("Or load a drawing: chlmon aoi set --file aoi.geojson")
        .with_help("Run: chlmon aoi set --help")
}

fn api_unreachable(message: String) -> CliError {
    CliError::new("Cannot reach the analysis API")
        .with_context(message)
        .with_suggestion("Check that the backend is running")
        .with_suggestion("Set the base URL: export CHLMON_API_BASE=\"http://localhost:8000\"")
        .with_suggestion("Or pass --api-base for a single command")
        .with_help("Run: chlmon config")
}

fn invalid_config(key: &str, message: String) -> CliError {
    CliError::new(message)
        .with_suggestion(format!("Check '{}' in .chlmon/config.toml or the CHLMON_* environment", key))
        .with_suggestion("Or reinitialize: chlmon init --force")
        .with_help("Run: chlmon config")
}

fn ee_client_missing() -> CliError {
    CliError::new("Earth Engine client id not configured")
        .with_suggestion("Add ee_client_id to .chlmon/config.toml")
        .with_suggestion("Or export CHLMON_EE_CLIENT_ID=\"<client-id>.apps.googleusercontent.com\"")
        .with_suggestion("Or pass --client-id to chlmon ee signin")
        .with_help("Run: chlmon ee signin --help")
}

/// Map a domain error to a CLI error with remediation hints
pub fn from_chlmon(error: &ChlmonError) -> CliError {
    let message = error.to_string();
    match error {
        ChlmonError::MissingAoi => missing_aoi(message),
        ChlmonError::Network(_) => api_unreachable(message),
        ChlmonError::ConfigMissing { key } if key == "ee_client_id" => ee_client_missing(),
        ChlmonError::ConfigInvalid { key, .. } => invalid_config(key, message),
        ChlmonError::UnknownLayer { .. } => {
            CliError::new(message).with_suggestion("List layer ids: chlmon layers list")
        }
        ChlmonError::IdentityExchange(_) => CliError::new(message)
            .with_suggestion("Obtain a fresh Google ID token and retry: chlmon auth signin"),
        _ => CliError::new(message),
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let error = match error.downcast::<CliError>() {
        Ok(cli_error) => return cli_error,
        Err(error) => error,
    };
    if let Some(domain) = error.downcast_ref::<ChlmonError>() {
        return from_chlmon(domain);
    }

    let message = format!("{:#}", error);

    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else if message.contains("permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
    } else {
        CliError::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_aoi_keeps_message() {
        let err = from_anyhow(anyhow::Error::new(ChlmonError::MissingAoi));
        assert_eq!(err.message, "Please draw an AOI on the map first.");
        assert!(!err.suggestions.is_empty());
    }

    #[test]
    fn test_cli_error_passes_through() {
        let err = from_anyhow(workspace_not_found().into());
        assert_eq!(err.message, "Not in a chlmon workspace");
    }

    #[test]
    fn test_api_error_body_is_the_message() {
        let err = from_anyhow(
            ChlmonError::Api { status: 500, body: "No images found".to_string() }.into(),
        );
        assert_eq!(err.message, "No images found");
    }
}
