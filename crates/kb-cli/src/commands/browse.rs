//! Browse command
//!
//! Open the terminal browser on the catalog.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

use kb_core::catalog::Catalog;
use kb_core::export::MarkdownViewer;
use kb_core::markdown::MarkdownRenderer;
use kb_core::theme::ThemeStore;
use kb_storage::{FsDocumentSource, PreferenceStore};
use kb_ui::{App, Browser};

use super::{build_clipboard, load_config};

/// Arguments for the browse command
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Directory that document paths resolve against
    #[arg(long, short)]
    pub root: Option<PathBuf>,

    /// Catalog file replacing the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Open this document path directly
    #[arg(long)]
    pub open: Option<String>,

    /// Hide the document tree beside the viewer
    #[arg(long)]
    pub no_tree: bool,
}

/// Execute the browse command
pub fn execute(args: BrowseArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    let catalog_file = args.catalog.or_else(|| config.catalog.file.clone());
    let catalog = Catalog::load_or_builtin(catalog_file.as_deref())
        .context("Failed to load catalog")?;

    let root = match args.root.or_else(|| config.catalog.docs_root.clone()) {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    info!("Resolving documents under {:?}", root);

    let store = PreferenceStore::default_location();
    // The config theme applies until a preference has been saved
    let has_saved_theme = matches!(store.load_raw(), Ok(Some(_)));
    let theme = if has_saved_theme {
        store.load_theme()
    } else {
        config.ui.theme
    };

    let renderer = MarkdownRenderer::with_options(config.render_options(theme));
    let viewer = MarkdownViewer::with_renderer(renderer, build_clipboard(&config))
        .with_policy(config.render.plain_text_policy);

    let mut browser = Browser::new(
        catalog,
        Box::new(FsDocumentSource::new(root)),
        viewer,
        Box::new(store),
    )
    .with_tree_panel(config.ui.show_tree && !args.no_tree);
    if !has_saved_theme {
        browser = browser.with_theme(config.ui.theme);
    }
    if let Some(path) = &args.open {
        browser.open(path);
    }

    let mut app = App::new(browser)?;
    app.run()
}
