//! Init command implementation

use crate::cli::InitArgs;
use crate::dry_run::{display_planned_actions, PlannedAction};
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::InitOutput;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use chlmon_core::config::{normalize_base, CliConfigOverrides, LayeredConfig};
use chlmon_core::state::WorkspaceSnapshot;
use std::fs;

pub fn execute(args: InitArgs, overrides: CliConfigOverrides, output: &OutputWriter) -> Result<()> {
    let workspace = Workspace::at(&args.path);
    let defaults = LayeredConfig::with_defaults();

    let api_base = match overrides.api_base {
        Some(base) => normalize_base(&base)?,
        None => defaults.api_base.value.clone(),
    };
    let ee_project = defaults.ee_project.value;

    // Check if workspace already exists
    if workspace.dir().exists() && !args.force {
        return Err(errors::workspace_exists(&args.path.display().to_string()).into());
    }

    let stale_sessions: Vec<_> = [workspace.session_path(), workspace.ee_session_path()]
        .into_iter()
        .filter(|p| p.exists())
        .collect();

    if args.dry_run {
        let mut actions = vec![
            PlannedAction::CreateDirectory { path: workspace.dir() },
            PlannedAction::WriteFile {
                path: workspace.config_path(),
                settings: vec![
                    format!("api_base = {}", api_base),
                    format!("ee_project = {}", ee_project),
                ],
            },
            PlannedAction::WriteFile { path: workspace.state_path(), settings: Vec::new() },
        ];
        actions.extend(stale_sessions.into_iter().map(|path| PlannedAction::RemoveFile { path }));

        return display_planned_actions(output, &actions);
    }

    // Create .chlmon directory
    fs::create_dir_all(workspace.dir()).context("Failed to create .chlmon directory")?;

    // Create config.toml
    let config_toml = format!(
        r#"# Chlorophyll Monitor Workspace Configuration

# Analysis API base URL (CHLMON_API_BASE overrides)
api_base = "{}"

# Google OAuth client id for the identity exchange (CHLMON_GOOGLE_CLIENT_ID)
# google_client_id = "<client-id>.apps.googleusercontent.com"

# Earth Engine OAuth client id for `chlmon ee signin` (CHLMON_EE_CLIENT_ID)
# ee_client_id = "<client-id>.apps.googleusercontent.com"

# Earth Engine project (CHLMON_EE_PROJECT)
ee_project = "{}"

# Give up on API requests after this many seconds (CHLMON_REQUEST_TIMEOUT)
# request_timeout_secs = 120
"#,
        api_base, ee_project
    );
    fs::write(workspace.config_path(), config_toml).context("Failed to write config.toml")?;

    // Create state.json
    WorkspaceSnapshot::default()
        .save(&workspace.state_path())
        .context("Failed to create state.json")?;

    for path in &stale_sessions {
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
    }

    // Output success message
    if output.is_json() {
        output.result(InitOutput {
            workspace_path: args.path.display().to_string(),
            api_base,
            ee_project,
        })?;
    } else {
        output.success(format!("Initialized chlmon workspace at {}", args.path.display()));

        output.section("Configuration");
        output.kv("API base", &api_base);
        output.kv("Earth Engine project", &ee_project);
        output.info("Next: set an area of interest with 'chlmon aoi set'");
    }

    Ok(())
}
