//! Catalog entries

use serde::{Deserialize, Serialize};

/// One document of the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocItem {
    pub title: String,
    /// Location handed to a document source; unique within a catalog
    pub path: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

/// A category card on the overview page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Accent colour as `#rrggbb`
    #[serde(default)]
    pub color: String,
}

impl Category {
    /// Accent colour as RGB, if `color` is a valid `#rrggbb` string
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.color.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

/// An entry of the component showcase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub key: String,
    pub title: String,
    pub path: String,
    /// kbase subcommand that demonstrates the component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// A group of the component showcase menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCategory {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub components: Vec<Component>,
}
