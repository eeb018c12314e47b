//! kb-ui - TUI library for kbase
//!
//! This crate provides the terminal browser for the knowledge base.
//!
//! # Overview
//!
//! The TUI provides:
//! - Category list and per-category document tree
//! - Markdown viewer with highlighted code blocks
//! - Copy as original text, plain text or formatted HTML
//! - Light/dark theme toggle persisted between runs
//!
//! # Example
//!
//! ```ignore
//! use kb_ui::{App, Browser};
//!
//! let browser = Browser::new(catalog, Box::new(source), viewer, Box::new(store));
//! let mut app = App::new(browser)?;
//! app.run()?;
//! ```

pub mod app;
pub mod events;
pub mod highlight;
pub mod markdown;
pub mod theme;

pub use app::{App, AppMode, AppState, Browser};
pub use theme::UiTheme;
