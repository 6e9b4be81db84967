//! Secret configuration file storage (`secret.json`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::atomic_file;
use crate::error::StorageError;
use crate::paths::AtelierPaths;

/// Contents of `secret.json`. Blank keys count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_api_key: Option<String>,
}

/// Read-only access to `secret.json`.
///
/// The file holds plaintext keys and should be mode 600.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            path: AtelierPaths::secret_file()?,
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file does not exist or is empty.
    pub fn load(&self) -> Result<Option<SecretConfig>, StorageError> {
        atomic_file::read(&self.path)?
            .map(|content| {
                serde_json::from_str(&content).map_err(|e| StorageError::json(&self.path, e))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SecretStorage::with_path(temp_dir.path().join("secret.json"));
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_load_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"openrouter_api_key": "sk-or-123"}"#).unwrap();

        let config = SecretStorage::with_path(path).load().unwrap().unwrap();
        assert_eq!(config.openrouter_api_key.as_deref(), Some("sk-or-123"));
        assert_eq!(config.image_api_key, None);
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = SecretStorage::with_path(path).load().unwrap_err();
        assert!(matches!(err, StorageError::Json { .. }));
    }
}
