//! Sequencing document loads so that only the latest request lands

use super::DocumentSource;
use crate::error::DocumentLoadError;
use crate::types::MarkdownDocument;
use tracing::{debug, warn};

/// Shown in place of a document that could not be loaded
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load document.";

/// Handle for one in-flight load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    path: String,
}

impl LoadTicket {
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// What a completed load means for the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Show the fetched document
    Loaded {
        path: String,
        document: MarkdownDocument,
    },
    /// Show the failure placeholder
    Failed {
        path: String,
        error: DocumentLoadError,
        placeholder: MarkdownDocument,
    },
    /// A newer request was started; ignore this result
    Stale,
}

impl LoadOutcome {
    /// Document to display, `None` for stale results
    pub fn document(&self) -> Option<&MarkdownDocument> {
        match self {
            LoadOutcome::Loaded { document, .. } => Some(document),
            LoadOutcome::Failed { placeholder, .. } => Some(placeholder),
            LoadOutcome::Stale => None,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            LoadOutcome::Loaded { path, .. } | LoadOutcome::Failed { path, .. } => Some(path),
            LoadOutcome::Stale => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, LoadOutcome::Stale)
    }
}

/// Issues tickets and drops results of superseded requests
#[derive(Debug, Default)]
pub struct DocumentLoader {
    latest: u64,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load; any earlier ticket becomes stale
    pub fn begin(&mut self, path: impl Into<String>) -> LoadTicket {
        self.latest += 1;
        let ticket = LoadTicket {
            seq: self.latest,
            path: path.into(),
        };
        debug!("Loading {} (request {})", ticket.path, ticket.seq);
        ticket
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.seq == self.latest
    }

    /// Finish a load
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<MarkdownDocument, DocumentLoadError>,
    ) -> LoadOutcome {
        if !self.is_current(&ticket) {
            debug!(
                "Dropping stale result for {} (request {}, latest {})",
                ticket.path, ticket.seq, self.latest
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(document) => LoadOutcome::Loaded {
                path: ticket.path,
                document,
            },
            Err(error) => {
                warn!("Error loading document {}: {}", ticket.path, error);
                LoadOutcome::Failed {
                    path: ticket.path,
                    error,
                    placeholder: MarkdownDocument::from(LOAD_FAILURE_MESSAGE),
                }
            }
        }
    }

    /// Fetch synchronously through `source`
    pub fn load(&mut self, source: &dyn DocumentSource, path: &str) -> LoadOutcome {
        let ticket = self.begin(path);
        let result = source.fetch(path);
        self.complete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemorySource;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_success() {
        let source = MemorySource::new().with("/a.md", "# A");
        let mut loader = DocumentLoader::new();
        let outcome = loader.load(&source, "/a.md");
        assert_eq!(outcome.document().unwrap().source(), "# A");
        assert_eq!(outcome.path(), Some("/a.md"));
    }

    #[test]
    fn test_failure_shows_placeholder() {
        let source = MemorySource::new();
        let mut loader = DocumentLoader::new();
        let outcome = loader.load(&source, "/missing.md");
        assert!(matches!(
            &outcome,
            LoadOutcome::Failed { error: DocumentLoadError::NotFound(p), .. } if p == "/missing.md"
        ));
        assert_eq!(outcome.document().unwrap().source(), LOAD_FAILURE_MESSAGE);
    }

    #[test]
    fn test_last_request_wins() {
        let mut loader = DocumentLoader::new();
        let first = loader.begin("/a.md");
        let second = loader.begin("/b.md");
        assert!(!loader.is_current(&first));

        let late = loader.complete(first, Ok(MarkdownDocument::from("old")));
        assert!(late.is_stale());
        assert!(late.document().is_none());

        let current = loader.complete(second, Ok(MarkdownDocument::from("new")));
        assert_eq!(current.document().unwrap().source(), "new");
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut loader = DocumentLoader::new();
        let first = loader.begin("/a.md");
        let _second = loader.begin("/b.md");
        let outcome = loader.complete(first, Err(DocumentLoadError::NotFound("/a.md".into())));
        assert_eq!(outcome, LoadOutcome::Stale);
    }
}
