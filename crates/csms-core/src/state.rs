use crate::error::{CsmsError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Store-wide bookkeeping. `revision` increases on every mutation so that
/// watchers can detect change without scanning the record directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub revision: u64,
    pub initialized_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

impl State {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            version: 1,
            revision: 0,
            initialized_at: now,
            last_updated: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::state_path(root);
        if !path.exists() {
            return Err(CsmsError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let state: State = serde_yaml::from_str(&data)?;
        Ok(state)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::state_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Increment the revision and persist. Returns the new revision.
    pub fn bump(root: &Path) -> Result<u64> {
        let mut state = Self::load(root)?;
        state.revision += 1;
        state.last_updated = Utc::now();
        state.save(root)?;
        Ok(state.revision)
    }

    /// Fails with `NotInitialized` unless `csms init` has run for `root`.
    pub fn ensure_initialized(root: &Path) -> Result<()> {
        if paths::state_path(root).exists() {
            Ok(())
        } else {
            Err(CsmsError::NotInitialized)
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
