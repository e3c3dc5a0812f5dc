use crate::output::OutputWriter;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A file-system change `init` would make
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlannedAction {
    CreateDirectory { path: PathBuf },
    WriteFile { path: PathBuf, settings: Vec<String> },
    RemoveFile { path: PathBuf },
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannedAction::CreateDirectory { path } => write!(f, "mkdir {}", path.display()),
            PlannedAction::WriteFile { path, .. } => write!(f, "write {}", path.display()),
            PlannedAction::RemoveFile { path } => write!(f, "remove {}", path.display()),
        }
    }
}

/// Print the plan without touching the workspace
pub fn display_planned_actions(output: &OutputWriter, actions: &[PlannedAction]) -> anyhow::Result<()> {
    if output.is_json() {
        return output.result(serde_json::json!({
            "dry_run": true,
            "planned_actions": actions,
        }));
    }

    output.section("Planned Actions (Dry Run)");
    for action in actions {
        output.info(action.to_string());
        if let PlannedAction::WriteFile { settings, .. } = action {
            for setting in settings {
                output.info(format!("    {}", setting));
            }
        }
    }
    output.info("Nothing written. Run without --dry-run to apply.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_path() {
        let action = PlannedAction::RemoveFile { path: PathBuf::from(".chlmon/session.json") };
        assert_eq!(action.to_string(), "remove .chlmon/session.json");
    }

    #[test]
    fn test_serialized_with_action_tag() {
        let action = PlannedAction::WriteFile {
            path: PathBuf::from(".chlmon/config.toml"),
            settings: vec!["api_base = http://localhost:8000".to_string()],
        };
        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(json["action"], "write_file");
        assert_eq!(json["settings"][0], "api_base = http://localhost:8000");
    }
}
