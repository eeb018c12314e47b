//! Core type definitions for kbase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Immutable markdown source supplied by a caller
///
/// Cloning is cheap; the text is shared. A document is replaced wholesale on
/// navigation and never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MarkdownDocument(Arc<str>);

impl MarkdownDocument {
    /// Wrap source text
    pub fn new(source: impl Into<String>) -> Self {
        MarkdownDocument(Arc::from(source.into()))
    }

    /// An empty document
    pub fn empty() -> Self {
        Self::default()
    }

    /// Raw markdown source
    pub fn source(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for MarkdownDocument {
    fn from(s: &str) -> Self {
        MarkdownDocument(Arc::from(s))
    }
}

impl From<String> for MarkdownDocument {
    fn from(s: String) -> Self {
        MarkdownDocument::new(s)
    }
}

impl fmt::Display for MarkdownDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which copy action a user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CopyKind {
    /// Unmodified markdown source
    Original,
    /// Text without markup
    Plain,
    /// Serialized HTML of the displayed output
    FormattedHtml,
}

impl CopyKind {
    /// All copy kinds, in menu order
    pub const ALL: [CopyKind; 3] = [CopyKind::Original, CopyKind::Plain, CopyKind::FormattedHtml];

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            CopyKind::Original => "Copy original",
            CopyKind::Plain => "Copy plain text",
            CopyKind::FormattedHtml => "Copy formatted text",
        }
    }

    /// Transient status shown after a successful copy
    pub fn success_message(&self) -> &'static str {
        match self {
            CopyKind::Original => "Copied original text",
            CopyKind::Plain => "Copied plain text",
            CopyKind::FormattedHtml => "Copied formatted text",
        }
    }
}

impl fmt::Display for CopyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyKind::Original => write!(f, "original"),
            CopyKind::Plain => write!(f, "plain"),
            CopyKind::FormattedHtml => write!(f, "formatted-html"),
        }
    }
}
