//! Configuration for kbase

use crate::error::{KbError, Result};
use crate::export::PlainTextPolicy;
use crate::markdown::{ParseOptions, RenderOptions};
use crate::responsive::BreakpointTable;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown rendering and export
    pub render: RenderConfig,
    /// Responsive layout
    pub layout: LayoutConfig,
    /// Terminal UI
    pub ui: UiConfig,
    /// Document catalog
    pub catalog: CatalogConfig,
    /// Clipboard backend
    pub clipboard: ClipboardConfig,
}

impl Config {
    /// Parse and validate
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout
            .breakpoints
            .validate()
            .map_err(|e| e.with_context("Invalid [layout] section"))?;
        if let Some(cmd) = &self.clipboard.command {
            if cmd.trim().is_empty() {
                return Err(KbError::Config(
                    "[clipboard] command must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Renderer settings for the given page theme
    pub fn render_options(&self, theme: Theme) -> RenderOptions {
        RenderOptions {
            parse: ParseOptions {
                raw_html: self.render.raw_html,
                autolink: self.render.autolink,
            },
            highlight: self.render.highlight,
            copy_controls: true,
            palette: theme.code_palette(),
        }
    }
}

/// Rendering-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pass embedded HTML through instead of dropping it
    pub raw_html: bool,
    /// Link bare URLs
    pub autolink: bool,
    /// Highlight language-tagged code blocks
    pub highlight: bool,
    /// How "copy plain text" derives its text
    pub plain_text_policy: PlainTextPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            raw_html: false,
            autolink: true,
            highlight: true,
            plain_text_policy: PlainTextPolicy::StripFencedBlocks,
        }
    }
}

/// Layout-related configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub breakpoints: BreakpointTable,
}

/// UI-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme used until a preference has been saved
    pub theme: Theme,
    /// Show the document tree panel
    pub show_tree: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            show_tree: true,
        }
    }
}

/// Catalog-related configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog file replacing the built-in one
    pub file: Option<PathBuf>,
    /// Directory that document paths resolve against
    pub docs_root: Option<PathBuf>,
}

/// Clipboard-related configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Command line reading clipboard text from stdin; autodetected when unset
    pub command: Option<String>,
}
