//! `config.toml` storage.

use atelier_core::config::AtelierConfig;
use std::path::{Path, PathBuf};

use super::atomic_file;
use crate::error::StorageError;
use crate::paths::AtelierPaths;

pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Storage at the default location (`~/.config/atelier/config.toml`).
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            path: AtelierPaths::config_file()?,
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the configuration; a missing or empty file yields the defaults.
    pub fn load(&self) -> Result<AtelierConfig, StorageError> {
        match atomic_file::read(&self.path)? {
            Some(content) => toml::from_str(&content).map_err(|source| StorageError::TomlParse {
                path: self.path.clone(),
                source,
            }),
            None => {
                tracing::debug!(
                    "[ConfigStorage] No config at {}, using defaults",
                    self.path.display()
                );
                Ok(AtelierConfig::default())
            }
        }
    }

    pub fn save(&self, config: &AtelierConfig) -> Result<(), StorageError> {
        let content = toml::to_string_pretty(config)?;
        atomic_file::write(&self.path, content.as_bytes())
    }
}
