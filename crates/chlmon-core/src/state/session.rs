use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChlmonError, Result};
use crate::models::Session;
use crate::ports::SessionStore;

/// Session persisted as JSON on disk, surviving restarts
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&content).map_err(|e| {
            ChlmonError::Serialization(format!(
                "Failed to parse session file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_session_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert!(store.load().unwrap().is_none());

        store.save(&Session::new("app-token", "user@example.com")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.email, "user@example.com");

        // Last write wins
        store.save(&Session::new("newer", "user@example.com")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().token, "newer");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_session_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(path);
        assert!(matches!(store.load(), Err(ChlmonError::Serialization(_))));
    }
}
