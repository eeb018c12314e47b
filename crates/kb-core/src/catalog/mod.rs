//! Knowledge base catalog
//!
//! Document metadata, category cards and the component showcase menu. The
//! built-in catalog is embedded at compile time; a user file can replace it.

mod model;
mod tree;

pub use model::{Category, Component, ComponentCategory, DocItem};
pub use tree::{DocTreeGroup, DocTreeLeaf, DEFAULT_SUBCATEGORY};

use crate::error::{KbError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Title shown for a category key that is not in the catalog
pub const DEFAULT_CATEGORY_TITLE: &str = "文档";

const BUILTIN_CATALOG: &str = include_str!("catalog.toml");

/// All catalog data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, rename = "category")]
    pub categories: Vec<Category>,
    #[serde(default, rename = "doc")]
    pub docs: Vec<DocItem>,
    #[serde(default, rename = "component_category")]
    pub component_categories: Vec<ComponentCategory>,
}

impl Catalog {
    /// The embedded catalog
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
            .map_err(|e| e.with_context("Built-in catalog is invalid"))
    }

    /// Parse and validate a catalog
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(KbError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)
            .map_err(|e| e.with_context(format!("Failed to load catalog {}", path.display())))?;
        debug!(
            "Loaded catalog from {:?}: {} documents",
            path,
            catalog.docs.len()
        );
        Ok(catalog)
    }

    /// The file at `path` if given, the built-in catalog otherwise
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    /// Check for duplicate keys and paths
    pub fn validate(&self) -> Result<()> {
        let mut keys = HashSet::new();
        for category in &self.categories {
            if !keys.insert(category.key.as_str()) {
                return Err(KbError::Catalog(format!(
                    "Duplicate category key: {}",
                    category.key
                )));
            }
        }

        let mut paths = HashSet::new();
        for doc in &self.docs {
            if doc.path.trim().is_empty() {
                return Err(KbError::Catalog(format!(
                    "Document '{}' has an empty path",
                    doc.title
                )));
            }
            if !paths.insert(doc.path.as_str()) {
                return Err(KbError::Catalog(format!(
                    "Duplicate document path: {}",
                    doc.path
                )));
            }
        }
        Ok(())
    }

    /// Documents of one category, catalog order
    pub fn docs_in(&self, category: &str) -> Vec<&DocItem> {
        self.docs.iter().filter(|d| d.category == category).collect()
    }

    pub fn find_by_path(&self, path: &str) -> Option<&DocItem> {
        self.docs.iter().find(|d| d.path == path)
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Display title of a category; unknown keys get [`DEFAULT_CATEGORY_TITLE`]
    pub fn category_title(&self, key: &str) -> &str {
        self.category(key)
            .map(|c| c.title.as_str())
            .unwrap_or(DEFAULT_CATEGORY_TITLE)
    }

    /// Documents of a category grouped by subcategory
    pub fn tree(&self, category: &str) -> Vec<DocTreeGroup> {
        tree::build(self.docs_in(category))
    }

    pub fn component_category(&self, key: &str) -> Option<&ComponentCategory> {
        self.component_categories.iter().find(|c| c.key == key)
    }

    /// Find a showcase component by its route path
    pub fn find_component(&self, path: &str) -> Option<(&ComponentCategory, &Component)> {
        self.component_categories.iter().find_map(|group| {
            group
                .components
                .iter()
                .find(|c| c.path == path)
                .map(|c| (group, c))
        })
    }
}
