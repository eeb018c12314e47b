//! Config command
//!
//! Manage kbase configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

use kb_core::config::Config;
use kb_storage::ConfigStore;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, config_path: Option<&Path>) -> Result<()> {
    let store = ConfigStore::resolve(config_path);
    match cmd {
        ConfigCommand::Show { json } => show_config(&store, json),
        ConfigCommand::Path => {
            println!("{}", store.path().display());
            Ok(())
        }
        ConfigCommand::Reset { force } => reset_config(&store, force),
    }
}

fn show_config(store: &ConfigStore, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let config = store
        .load()
        .with_context(|| format!("Failed to load config {}", store.path().display()))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if store.exists() {
        println!("{}", store.path().display().to_string().dimmed());
    } else {
        println!(
            "{}",
            format!("{} (not created, showing defaults)", store.path().display()).dimmed()
        );
    }
    println!();
    println!("{}", config.to_toml_string()?);
    Ok(())
}

fn reset_config(store: &ConfigStore, force: bool) -> Result<()> {
    use colored::Colorize;

    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    // Backup existing
    if store.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            store.path().display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(store.path(), &backup_path)
            .with_context(|| format!("Failed to back up {}", store.path().display()))?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    store.save(&Config::default())?;
    println!(
        "{} Configuration reset to defaults at {}",
        "✓".green(),
        store.path().display()
    );

    Ok(())
}
