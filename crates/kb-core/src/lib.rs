//! kb-core - Core library for kbase
//!
//! This crate provides the markdown rendering and clipboard export pipeline,
//! the responsive style resolver, the document catalog, document loading and
//! the theme model.

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod markdown;
pub mod responsive;
pub mod theme;
pub mod types;

pub use error::{ClipboardError, DocumentLoadError, KbError, MalformedResponsiveValue, Result};
pub use types::*;
