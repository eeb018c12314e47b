//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod browse;
pub mod config;
pub mod copy;
pub mod docs;
pub mod layout;
pub mod render;
pub mod theme;
pub mod tools;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kb_core::config::Config;
use kb_core::export::{Clipboard, ClipboardCommand, CommandClipboard, MemoryClipboard};
use kb_core::{ClipboardError, MarkdownDocument};
use kb_storage::ConfigStore;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// kbase - markdown knowledge base viewer and exporter
#[derive(Debug, Parser)]
#[command(name = "kbase")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "KBASE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse the knowledge base in the terminal
    Browse(browse::BrowseArgs),

    /// Render a markdown file
    Render(render::RenderArgs),

    /// Copy a markdown file to the clipboard
    Copy(copy::CopyArgs),

    /// List categories or the documents of one category
    Docs(docs::DocsArgs),

    /// Print responsive flex layout CSS
    Layout(layout::LayoutArgs),

    /// List the component showcase
    Tools(tools::ToolsArgs),

    /// Show or change the saved theme
    #[command(subcommand)]
    Theme(theme::ThemeCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Browse(args) => browse::execute(args, config_path),
        Commands::Render(args) => render::execute(args, config_path),
        Commands::Copy(args) => copy::execute(args, config_path),
        Commands::Docs(args) => docs::execute(args, config_path),
        Commands::Layout(args) => layout::execute(args, config_path),
        Commands::Tools(args) => tools::execute(args, config_path),
        Commands::Theme(cmd) => theme::execute(cmd),
        Commands::Config(cmd) => config::execute(cmd, config_path),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the configuration from `--config` or the default location
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    let store = ConfigStore::resolve(path);
    debug!("Using config {:?}", store.path());
    store
        .load()
        .with_context(|| format!("Failed to load config {}", store.path().display()))
}

/// The configured clipboard command, or the first platform command found
pub(crate) fn command_clipboard(config: &Config) -> Result<CommandClipboard, ClipboardError> {
    if let Some(line) = &config.clipboard.command {
        if let Some(command) = ClipboardCommand::parse(line) {
            return Ok(CommandClipboard::new(command));
        }
    }
    CommandClipboard::detect()
}

/// Like [`command_clipboard`], keeping copies in memory when no command exists
pub(crate) fn build_clipboard(config: &Config) -> Box<dyn Clipboard> {
    match command_clipboard(config) {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            warn!("{}; copies stay in memory", e);
            Box::new(MemoryClipboard::new())
        }
    }
}

/// Read a markdown file, `-` meaning stdin
pub(crate) fn read_document(path: &Path) -> Result<MarkdownDocument> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    Ok(MarkdownDocument::new(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_configured_clipboard_command() {
        let mut config = Config::default();
        config.clipboard.command = Some("wl-copy --trim-newline".to_string());
        assert_eq!(build_clipboard(&config).name(), "wl-copy");
    }
}
