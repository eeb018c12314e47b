//! kb-storage - Storage library for kbase
//!
//! This crate provides filesystem-backed implementations of the core storage
//! interfaces: the theme preference store, the configuration file and the
//! document source.

mod config_store;
mod document_source;
mod paths;
mod preferences;

pub use config_store::ConfigStore;
pub use document_source::FsDocumentSource;
pub use paths::{atomic_write, default_config_dir, default_data_dir};
pub use preferences::{PreferenceStore, Preferences};
