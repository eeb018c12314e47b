//! Error types for kbase

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for kbase
#[derive(Debug, Error)]
pub enum KbError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog data is inconsistent
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Preference storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Document could not be loaded
    #[error(transparent)]
    Document(#[from] DocumentLoadError),

    /// Clipboard write failed
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// Responsive value violated its contract
    #[error(transparent)]
    Responsive(#[from] MalformedResponsiveValue),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<KbError>,
    },
}

impl KbError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        KbError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<toml::de::Error> for KbError {
    fn from(err: toml::de::Error) -> Self {
        KbError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for KbError {
    fn from(err: toml::ser::Error) -> Self {
        KbError::Toml(err.to_string())
    }
}

/// A document fetch failed or returned something that is not text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentLoadError {
    /// Nothing exists at the requested path
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The path escapes the document root or is otherwise unusable
    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    /// The content is not UTF-8 text
    #[error("Document is not valid UTF-8 text: {0}")]
    NotText(String),

    /// Underlying read failed
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },
}

/// The platform denied or failed a clipboard write
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// No clipboard backend could be found
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard command ran but reported failure
    #[error("Clipboard command '{command}' failed: {message}")]
    Command { command: String, message: String },
}

/// A responsive value that cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedResponsiveValue {
    /// The sequence has no entries at all
    #[error("Responsive sequence is empty")]
    Empty,

    /// Index 0 (the base value) is undefined
    #[error("Responsive sequence has no base value")]
    MissingBase,
}

/// Result type alias for kbase
pub type Result<T> = std::result::Result<T, KbError>;
