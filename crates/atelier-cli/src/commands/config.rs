//! `atelier config init|show`.

use anyhow::{Context, Result};
use atelier_core::config::AtelierConfig;
use atelier_infrastructure::{AtelierPaths, ConfigStorage};
use colored::Colorize;

pub fn init(force: bool) -> Result<()> {
    let storage = ConfigStorage::new()?;
    if storage.exists() && !force {
        println!(
            "{}",
            format!(
                "{} already exists (use --force to overwrite)",
                storage.path().display()
            )
            .yellow()
        );
    } else {
        storage
            .save(&AtelierConfig::default())
            .context("Failed to write config.toml")?;
        println!("Wrote {}", storage.path().display());
    }

    let secret_path = AtelierPaths::ensure_secret_file()?;
    println!("API keys go in {}", secret_path.display());
    Ok(())
}

pub fn show() -> Result<()> {
    let storage = ConfigStorage::new()?;
    let config = storage.load()?;
    println!(
        "{}",
        format!("# {}", storage.path().display()).bright_black()
    );
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
