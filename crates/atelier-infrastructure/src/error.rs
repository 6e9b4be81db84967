use atelier_core::AtelierError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the filesystem collaborators.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot find home directory")]
    HomeDirNotFound,

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

impl From<StorageError> for AtelierError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::HomeDirNotFound => AtelierError::config(err.to_string()),
            StorageError::Io { .. } => AtelierError::io(err.to_string()),
            StorageError::TomlParse { .. } | StorageError::UnsupportedVersion { .. } => {
                AtelierError::config(err.to_string())
            }
            StorageError::TomlSer(_) | StorageError::Json { .. } => {
                AtelierError::internal(err.to_string())
            }
        }
    }
}
