//! Conversation and gallery snapshot (`snapshot.json`).

use atelier_core::{Artifact, Message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::atomic_file;
use crate::error::StorageError;
use crate::paths::AtelierPaths;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Messages and artifacts as persisted between runs, field for field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbenchSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl WorkbenchSnapshot {
    pub fn new(messages: Vec<Message>, artifacts: Vec<Artifact>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            messages,
            artifacts,
        }
    }
}

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            path: AtelierPaths::snapshot_file()?,
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, snapshot: &WorkbenchSnapshot) -> Result<(), StorageError> {
        let json =
            serde_json::to_string_pretty(snapshot).map_err(|e| StorageError::json(&self.path, e))?;
        atomic_file::write(&self.path, json.as_bytes())?;
        tracing::debug!(
            "[SnapshotStore] Saved {} messages and {} artifacts to {}",
            snapshot.messages.len(),
            snapshot.artifacts.len(),
            self.path.display()
        );
        Ok(())
    }

    /// `None` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<WorkbenchSnapshot>, StorageError> {
        let Some(content) = atomic_file::read(&self.path)? else {
            return Ok(None);
        };
        let snapshot: WorkbenchSnapshot =
            serde_json::from_str(&content).map_err(|e| StorageError::json(&self.path, e))?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(Some(snapshot))
    }
}
