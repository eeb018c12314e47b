//! Copy command
//!
//! Copy a markdown file to the clipboard as original text, plain text or
//! formatted HTML.

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

use kb_core::export::{export_text, MarkdownViewer, PlainTextPolicy};
use kb_core::markdown::MarkdownRenderer;
use kb_core::CopyKind;

use super::{command_clipboard, load_config, read_document};

/// What to copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CopyMode {
    /// Markdown source, byte for byte
    Original,
    /// Text without markup
    Plain,
    /// Rendered HTML without copy controls
    Html,
}

impl From<CopyMode> for CopyKind {
    fn from(mode: CopyMode) -> Self {
        match mode {
            CopyMode::Original => CopyKind::Original,
            CopyMode::Plain => CopyKind::Plain,
            CopyMode::Html => CopyKind::FormattedHtml,
        }
    }
}

/// Arguments for the copy command
#[derive(Debug, Args)]
pub struct CopyArgs {
    /// Markdown file (`-` for stdin)
    pub file: PathBuf,

    /// What to copy
    #[arg(long, short, value_enum, default_value = "original")]
    pub mode: CopyMode,

    /// Plain-text policy (overrides the config)
    #[arg(long)]
    pub policy: Option<PlainTextPolicy>,

    /// Print the text instead of writing the clipboard
    #[arg(long)]
    pub print: bool,
}

/// Execute the copy command
pub fn execute(args: CopyArgs, config_path: Option<&Path>) -> Result<()> {
    use colored::Colorize;

    let config = load_config(config_path)?;
    let policy = args.policy.unwrap_or(config.render.plain_text_policy);
    let kind = CopyKind::from(args.mode);

    let document = read_document(&args.file)?;
    let renderer = MarkdownRenderer::with_options(config.render_options(config.ui.theme));

    if args.print {
        let output = renderer.render(&document);
        print!("{}", export_text(kind, &document, &output, policy));
        return Ok(());
    }

    let clipboard = command_clipboard(&config)
        .context("No clipboard available; set [clipboard] command or use --print")?;
    let mut viewer =
        MarkdownViewer::with_renderer(renderer, Box::new(clipboard)).with_policy(policy);
    viewer.set_document(document);

    let result = viewer.copy(kind);
    let message = viewer
        .last_outcome()
        .map(|o| o.message())
        .unwrap_or_default();
    match result {
        Ok(()) => {
            println!(
                "{} {} ({})",
                "✓".green(),
                message,
                viewer.clipboard_name().dimmed()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), message);
            bail!(e)
        }
    }
}
