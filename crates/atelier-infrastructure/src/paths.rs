//! Path management for atelier configuration files.
//!
//! ```text
//! ~/.config/atelier/
//! ├── config.toml     # Application configuration
//! ├── secret.json     # API keys
//! └── snapshot.json   # Conversation and gallery snapshot
//! ```
//!
//! `ATELIER_CONFIG_DIR` overrides the directory.

use std::path::PathBuf;

use crate::error::StorageError;
use crate::storage::SecretConfig;
use crate::storage::atomic_file;

pub const CONFIG_DIR_ENV: &str = "ATELIER_CONFIG_DIR";

pub struct AtelierPaths;

impl AtelierPaths {
    pub fn config_dir() -> Result<PathBuf, StorageError> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::home_dir()
            .map(|home| home.join(".config").join("atelier"))
            .ok_or(StorageError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, StorageError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Keep this file at mode 600.
    pub fn secret_file() -> Result<PathBuf, StorageError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    pub fn snapshot_file() -> Result<PathBuf, StorageError> {
        Ok(Self::config_dir()?.join("snapshot.json"))
    }

    /// Creates `secret.json` with empty keys unless it already exists.
    ///
    /// The file is restricted to the owner on Unix.
    pub fn ensure_secret_file() -> Result<PathBuf, StorageError> {
        let secret_path = Self::secret_file()?;
        if secret_path.exists() {
            return Ok(secret_path);
        }

        let template = SecretConfig {
            openrouter_api_key: Some(String::new()),
            image_api_key: Some(String::new()),
        };
        let json = serde_json::to_string_pretty(&template)
            .map_err(|e| StorageError::json(&secret_path, e))?;
        atomic_file::write(&secret_path, json.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)
                .map_err(|e| StorageError::io(&secret_path, e))?;
        }

        Ok(secret_path)
    }
}
