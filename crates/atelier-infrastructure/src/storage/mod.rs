//! Storage layer for atomic file operations.

pub(crate) mod atomic_file;
mod config_storage;
mod secret_storage;
mod snapshot_store;

pub use config_storage::ConfigStorage;
pub use secret_storage::{SecretConfig, SecretStorage};
pub use snapshot_store::{SNAPSHOT_VERSION, SnapshotStore, WorkbenchSnapshot};
