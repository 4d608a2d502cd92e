use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::models::state::AppState;

/// JSON file holding the alert memory between runs
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state, or a fresh version-1 document if the file is absent
    pub fn load(&self) -> Result<AppState, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No state at {}, starting fresh", self.path.display());
                return Ok(AppState::default());
            }
            Err(e) => {
                return Err(AppError::State(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&raw).map_err(|e| {
            AppError::State(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }

    /// Write the state next to the target, then rename over it, so a crash
    /// never leaves a truncated file behind
    pub fn save(&self, state: &AppState) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::State(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = state
            .to_pretty_json()
            .map_err(|e| AppError::State(format!("failed to encode state: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| {
            AppError::State(format!("failed to write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            AppError::State(format!("failed to replace {}: {}", self.path.display(), e))
        })?;

        tracing::debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}
