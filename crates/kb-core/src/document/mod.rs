//! Document sources and the last-request-wins loader

mod loader;

pub use loader::{DocumentLoader, LoadOutcome, LoadTicket, LOAD_FAILURE_MESSAGE};

use crate::error::DocumentLoadError;
use crate::types::MarkdownDocument;
use std::collections::HashMap;

/// Supplies markdown text for a catalog path
pub trait DocumentSource {
    fn fetch(&self, path: &str) -> Result<MarkdownDocument, DocumentLoadError>;
}

/// Documents held in memory, keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, MarkdownDocument>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, source: impl Into<MarkdownDocument>) {
        self.documents.insert(path.into(), source.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, path: impl Into<String>, source: impl Into<MarkdownDocument>) -> Self {
        self.insert(path, source);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn fetch(&self, path: &str) -> Result<MarkdownDocument, DocumentLoadError> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| DocumentLoadError::NotFound(path.to_string()))
    }
}
