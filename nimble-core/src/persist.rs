//! JSON persistence for action libraries and roll histories.

use crate::binding::ActionLibrary;
use crate::history::{RollHistory, RollRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current history file version.
const HISTORY_VERSION: u32 = 1;

/// A roll history as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedHistory {
    /// Format version for compatibility checking.
    pub version: u32,

    /// When the file was written.
    pub saved_at: DateTime<Utc>,

    /// Records, oldest first.
    pub records: Vec<RollRecord>,
}

impl SavedHistory {
    pub fn new(history: &RollHistory) -> Self {
        Self {
            version: HISTORY_VERSION,
            saved_at: Utc::now(),
            records: history.iter().cloned().collect(),
        }
    }

    pub fn into_history(self) -> RollHistory {
        RollHistory::from_records(self.records)
    }
}

/// Write `content` to a sibling temp file, then rename it over `path`.
///
/// A reader sees either the old file or the new one, never a partial write.
async fn write_replacing(path: &Path, content: String) -> Result<(), PersistError> {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    let staged = PathBuf::from(staged);

    fs::write(&staged, content).await?;
    fs::rename(&staged, path).await?;
    Ok(())
}

impl RollHistory {
    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(&SavedHistory::new(self))?;
        write_replacing(path.as_ref(), content).await
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: SavedHistory = serde_json::from_str(&content)?;

        if saved.version != HISTORY_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: HISTORY_VERSION,
                found: saved.version,
            });
        }

        Ok(saved.into_history())
    }

    /// Load a history file, or start an empty history if it does not exist yet.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        if !fs::try_exists(path).await? {
            return Ok(Self::new());
        }
        Self::load_json(path).await
    }
}

impl ActionLibrary {
    /// Load authored actions from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        write_replacing(path.as_ref(), content).await
    }
}
