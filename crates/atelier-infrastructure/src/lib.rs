//! Filesystem collaborators: paths, credentials, configuration and
//! snapshots.

pub mod error;
pub mod paths;
pub mod secret_service;
pub mod storage;

pub use error::StorageError;
pub use paths::AtelierPaths;
pub use secret_service::SecretService;
pub use storage::{ConfigStorage, SecretConfig, SecretStorage, SnapshotStore, WorkbenchSnapshot};
