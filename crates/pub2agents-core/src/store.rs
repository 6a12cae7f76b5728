//! JSON persistence of agent lists
//!
//! Files have the shape `{"count": <n>, "list": [<agent>, ...]}` where
//! `count` always equals the length of `list` after a save.

use crate::error::StoreError;
use crate::export::YearMonth;
use pub2agents_domain::Agent;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct AgentDocument {
    #[serde(default)]
    count: usize,
    list: Vec<Agent>,
}

/// A JSON file holding a list of agents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStore {
    path: PathBuf,
}

impl AgentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all agents. Fails when the file is missing or malformed.
    pub fn load(&self) -> Result<Vec<Agent>, StoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let document: AgentDocument =
            serde_json::from_str(&content).map_err(|e| StoreError::Format {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        if document.count != document.list.len() {
            debug!(
                path = %self.path.display(),
                count = document.count,
                actual = document.list.len(),
                "Stored count does not match list length"
            );
        }
        Ok(document.list)
    }

    /// Like [`load`](Self::load), but a missing file is an empty store
    pub fn load_or_empty(&self) -> Result<Vec<Agent>, StoreError> {
        if !self.exists() {
            debug!(path = %self.path.display(), "Store does not exist yet, starting empty");
            return Ok(Vec::new());
        }
        self.load()
    }

    /// Replace the file contents with `agents`, creating parent directories
    pub fn save(&self, agents: &[Agent]) -> Result<(), StoreError> {
        let write_err = |message: String| StoreError::Write {
            path: self.path.clone(),
            message,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let document = serde_json::json!({
            "count": agents.len(),
            "list": agents,
        });
        let content =
            serde_json::to_string_pretty(&document).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| write_err(e.to_string()))?;

        debug!(path = %self.path.display(), count = agents.len(), "Saved agents");
        Ok(())
    }
}

/// Write low-confidence agents to `<dir>/low_agents_<year>_<month>.json`
pub fn save_low_confidence(
    agents: &[Agent],
    dir: &Path,
    date: YearMonth,
) -> Result<PathBuf, StoreError> {
    let path = dir.join(format!("low_agents_{}.json", date.file_suffix()));
    AgentStore::new(&path).save(agents)?;
    Ok(path)
}
