pub mod chat;
pub mod config;
pub mod gallery;
mod render;

use anyhow::{Context, Result};
use atelier_application::Workbench;
use atelier_infrastructure::{ConfigStorage, SecretService, SnapshotStore, WorkbenchSnapshot};

/// Builds the workbench from the user's files and restores the last
/// snapshot.
pub(crate) async fn open_workbench() -> Result<(Workbench, SnapshotStore)> {
    let config = ConfigStorage::new()?
        .load()
        .context("Failed to load config.toml")?;
    let credentials = SecretService::new()?
        .load_credentials()
        .context("Failed to load credentials")?;
    let workbench = Workbench::new(config, credentials)?;

    let store = SnapshotStore::new()?;
    match store.load() {
        Ok(Some(snapshot)) => {
            workbench
                .restore(snapshot.messages, snapshot.artifacts)
                .await?;
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!("Ignoring unreadable snapshot at {}: {}", store.path().display(), err);
        }
    }

    Ok((workbench, store))
}

pub(crate) async fn save_snapshot(workbench: &Workbench, store: &SnapshotStore) -> Result<()> {
    let (messages, artifacts) = workbench.export().await;
    store
        .save(&WorkbenchSnapshot::new(messages, artifacts))
        .with_context(|| format!("Failed to save snapshot to {}", store.path().display()))
}
