//! Theme command
//!
//! Show or change the saved light/dark preference.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;

use kb_core::theme::{Theme, ThemeContext, ThemeStore};
use kb_storage::PreferenceStore;

/// Theme subcommands
#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Show the saved theme
    Show {
        /// Preferences directory
        #[arg(long, env = "KBASE_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Save a theme
    Set {
        /// light or dark
        theme: Theme,

        /// Preferences directory
        #[arg(long, env = "KBASE_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Switch between light and dark
    Toggle {
        /// Preferences directory
        #[arg(long, env = "KBASE_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },
}

/// Execute the theme command
pub fn execute(cmd: ThemeCommand) -> Result<()> {
    match cmd {
        ThemeCommand::Show { data_dir } => show_theme(&store(data_dir)),
        ThemeCommand::Set { theme, data_dir } => set_theme(&mut store(data_dir), theme),
        ThemeCommand::Toggle { data_dir } => toggle_theme(&mut store(data_dir)),
    }
}

fn store(data_dir: Option<PathBuf>) -> PreferenceStore {
    match data_dir {
        Some(dir) => PreferenceStore::new(dir),
        None => PreferenceStore::default_location(),
    }
}

fn show_theme(store: &PreferenceStore) -> Result<()> {
    use colored::Colorize;

    let theme = store.load_theme();
    println!("{}", theme);
    if !store.path().exists() {
        eprintln!("{}", "(default, nothing saved yet)".dimmed());
    }
    Ok(())
}

fn set_theme(store: &mut PreferenceStore, theme: Theme) -> Result<()> {
    use colored::Colorize;

    store
        .save_theme(theme)
        .with_context(|| format!("Failed to save {}", store.path().display()))?;
    println!("{} Theme set to {}", "✓".green(), theme.to_string().cyan());
    Ok(())
}

fn toggle_theme(store: &mut PreferenceStore) -> Result<()> {
    use colored::Colorize;

    let mut context = ThemeContext::load(&*store);
    let theme = context
        .toggle_and_save(store)
        .with_context(|| format!("Failed to save {}", store.path().display()))?;
    println!("{} Theme set to {}", "✓".green(), theme.to_string().cyan());
    Ok(())
}
