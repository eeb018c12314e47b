//! Clipboard export of rendered documents
//!
//! Three representations can be copied from a viewer:
//! - the original markdown source, byte for byte
//! - plain text, derived under a [`PlainTextPolicy`]
//! - formatted HTML, the displayed tree with copy controls pruned
//!
//! # Example
//!
//! ```ignore
//! use kb_core::export::{MarkdownViewer, MemoryClipboard};
//!
//! let clipboard = MemoryClipboard::new();
//! let mut viewer = MarkdownViewer::new(Box::new(clipboard.clone()));
//! viewer.set_document("# Hello".into());
//! viewer.copy_formatted_html()?;
//! assert_eq!(clipboard.contents().as_deref(), Some("<h1>Hello</h1>"));
//! ```

mod clipboard;
mod plain;
mod viewer;

pub use clipboard::{Clipboard, ClipboardCommand, CommandClipboard, MemoryClipboard};
pub use plain::{plain_text, strip_fenced_blocks, PlainTextPolicy};
pub use viewer::{CopyOutcome, MarkdownViewer, COPY_FAILED_MESSAGE};

use crate::markdown::RenderedOutput;
use crate::types::{CopyKind, MarkdownDocument};

/// Text a copy action of the given kind would write
pub fn export_text(
    kind: CopyKind,
    document: &MarkdownDocument,
    output: &RenderedOutput,
    policy: PlainTextPolicy,
) -> String {
    match kind {
        CopyKind::Original => document.source().to_string(),
        CopyKind::Plain => plain_text(document, output, policy),
        CopyKind::FormattedHtml => output.export_html(),
    }
}
