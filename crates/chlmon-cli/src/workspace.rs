//! The `.chlmon/` workspace: configuration, persisted dashboard state and
//! stored sessions.

use anyhow::{Context, Result};
use chlmon_client::ApiClient;
use chlmon_core::config::{CliConfigOverrides, LayeredConfig};
use chlmon_core::ports::SessionStore;
use chlmon_core::state::{AppState, FileSessionStore, MemoryMap, WorkspaceSnapshot};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::chart_view::TerminalChart;
use crate::errors;

pub const WORKSPACE_DIR: &str = ".chlmon";

/// Dashboard state on the terminal surfaces
pub type TerminalState = AppState<MemoryMap, TerminalChart>;

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the workspace root by walking up from the current directory
    pub fn find() -> Result<Self> {
        let mut current = std::env::current_dir()?;
        loop {
            let dir = current.join(WORKSPACE_DIR);
            if dir.is_dir() {
                return Ok(Self::at(current));
            }
            if !current.pop() {
                return Err(errors::workspace_not_found().into());
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir().join("config.toml")
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir().join("state.json")
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir().join("session.json")
    }

    pub fn ee_session_path(&self) -> PathBuf {
        self.dir().join("ee_session.json")
    }

    /// Defaults, then config.toml, then CHLMON_* variables, then flags
    pub fn load_config(&self, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
        let mut config = LayeredConfig::with_defaults();
        let path = self.config_path();
        if path.exists() {
            config = config.load_from_file(&path)?;
        }
        let mut config = config.load_from_env();
        config.update_from_cli(overrides)?;
        Ok(config)
    }

    pub fn load_state(&self) -> Result<TerminalState> {
        let snapshot = WorkspaceSnapshot::load(&self.state_path())?;
        tracing::debug!(
            layers = snapshot.layers.len(),
            next_layer_id = snapshot.next_layer_id,
            "Loaded workspace state"
        );
        Ok(AppState::from_snapshot(MemoryMap::new(), TerminalChart::new(), snapshot))
    }

    pub fn save_state(&self, state: &TerminalState) -> Result<()> {
        state
            .snapshot()
            .save(&self.state_path())
            .with_context(|| format!("Failed to write {}", self.state_path().display()))
    }

    pub fn sessions(&self) -> Arc<dyn SessionStore> {
        Arc::new(FileSessionStore::new(self.session_path()))
    }

    pub fn api_client(&self, config: &LayeredConfig) -> Result<ApiClient> {
        let base = config.api_base.value.clone();
        let client = match config.request_timeout_secs.value {
            Some(secs) => ApiClient::with_timeout(base, self.sessions(), Duration::from_secs(secs))?,
            None => ApiClient::new(base, self.sessions()),
        };
        Ok(client)
    }
}
