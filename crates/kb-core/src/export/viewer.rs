//! Markdown viewer handle with copy actions

use super::clipboard::Clipboard;
use super::export_text;
use super::plain::PlainTextPolicy;
use crate::error::ClipboardError;
use crate::markdown::{CodePalette, MarkdownRenderer, RenderedOutput};
use crate::types::{CopyKind, MarkdownDocument};
use tracing::{debug, warn};

/// Status shown when any copy action fails
pub const COPY_FAILED_MESSAGE: &str = "Copy failed";

/// Result of one copy action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome {
    pub kind: CopyKind,
    pub result: Result<(), ClipboardError>,
}

impl CopyOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Transient status message for the user
    pub fn message(&self) -> &'static str {
        match self.result {
            Ok(()) => self.kind.success_message(),
            Err(_) => COPY_FAILED_MESSAGE,
        }
    }
}

/// Displays one markdown document and copies it in three representations
///
/// The viewer owns the current document and its rendered output. Setting a new
/// document replaces both; every copy reads whatever is current at call time.
pub struct MarkdownViewer {
    renderer: MarkdownRenderer,
    clipboard: Box<dyn Clipboard>,
    policy: PlainTextPolicy,
    document: MarkdownDocument,
    output: RenderedOutput,
    last_outcome: Option<CopyOutcome>,
}

impl MarkdownViewer {
    /// Viewer with the default renderer, showing an empty document
    pub fn new(clipboard: Box<dyn Clipboard>) -> Self {
        Self::with_renderer(MarkdownRenderer::new(), clipboard)
    }

    pub fn with_renderer(renderer: MarkdownRenderer, clipboard: Box<dyn Clipboard>) -> Self {
        let document = MarkdownDocument::empty();
        let output = renderer.render(&document);
        Self {
            renderer,
            clipboard,
            policy: PlainTextPolicy::default(),
            document,
            output,
            last_outcome: None,
        }
    }

    /// Builder: plain-text policy
    pub fn with_policy(mut self, policy: PlainTextPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PlainTextPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: PlainTextPolicy) {
        self.policy = policy;
    }

    /// Show a new document, replacing the previous output
    pub fn set_document(&mut self, document: MarkdownDocument) -> &RenderedOutput {
        self.output = self.renderer.render(&document);
        self.document = document;
        self.last_outcome = None;
        &self.output
    }

    /// Switch the code palette and re-render the current document
    pub fn set_palette(&mut self, palette: CodePalette) {
        self.renderer.set_palette(palette);
        self.output = self.renderer.render(&self.document);
    }

    /// Code palette of the current output
    pub fn palette(&self) -> &CodePalette {
        &self.renderer.options().palette
    }

    pub fn document(&self) -> &MarkdownDocument {
        &self.document
    }

    pub fn output(&self) -> &RenderedOutput {
        &self.output
    }

    pub fn clipboard_name(&self) -> &str {
        self.clipboard.name()
    }

    /// Outcome of the most recent copy on the current document
    pub fn last_outcome(&self) -> Option<&CopyOutcome> {
        self.last_outcome.as_ref()
    }

    /// Copy the unmodified markdown source
    pub fn copy_original_text(&mut self) -> Result<(), ClipboardError> {
        self.copy(CopyKind::Original)
    }

    /// Copy text without markup under the configured policy
    pub fn copy_plain_text(&mut self) -> Result<(), ClipboardError> {
        self.copy(CopyKind::Plain)
    }

    /// Copy the displayed markup with copy controls removed
    pub fn copy_formatted_html(&mut self) -> Result<(), ClipboardError> {
        self.copy(CopyKind::FormattedHtml)
    }

    /// Run one copy action and record its outcome
    pub fn copy(&mut self, kind: CopyKind) -> Result<(), ClipboardError> {
        let text = self.text_for(kind);
        let result = self.clipboard.write_text(&text);
        match &result {
            Ok(()) => debug!(
                "{} ({} bytes via {})",
                kind.success_message(),
                text.len(),
                self.clipboard.name()
            ),
            Err(e) => warn!("Copy {} failed: {}", kind, e),
        }
        self.last_outcome = Some(CopyOutcome {
            kind,
            result: result.clone(),
        });
        result
    }

    /// Text a copy of `kind` would write right now
    pub fn text_for(&self, kind: CopyKind) -> String {
        export_text(kind, &self.document, &self.output, self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemoryClipboard;
    use crate::markdown::COPY_CONTROL_CLASS;
    use pretty_assertions::assert_eq;

    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("permission denied".to_string()))
        }

        fn name(&self) -> &str {
            "denied"
        }
    }

    fn viewer_with(source: &str) -> (MarkdownViewer, MemoryClipboard) {
        let clipboard = MemoryClipboard::new();
        let mut viewer = MarkdownViewer::new(Box::new(clipboard.clone()));
        viewer.set_document(MarkdownDocument::from(source));
        (viewer, clipboard)
    }

    #[test]
    fn test_copy_original_is_byte_identical() {
        let source = "# T\r\n\n```js\nx\n```\n  trailing  ";
        let (mut viewer, clipboard) = viewer_with(source);
        viewer.copy_original_text().unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some(source));
        assert_eq!(viewer.last_outcome().unwrap().message(), "Copied original text");
    }

    #[test]
    fn test_copy_plain_strips_fences_by_default() {
        let (mut viewer, clipboard) = viewer_with("before\n```js\nconst x=1;\n```\nafter");
        viewer.copy_plain_text().unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("before\n\nafter"));
    }

    #[test]
    fn test_copy_plain_flatten_policy() {
        let (viewer, clipboard) = viewer_with("**bold**");
        let mut viewer = viewer.with_policy(PlainTextPolicy::FlattenRendered);
        viewer.copy_plain_text().unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("bold"));
    }

    #[test]
    fn test_copy_formatted_html_prunes_controls() {
        let (mut viewer, clipboard) = viewer_with("text\n\n```js\nconst x=1;\n```");
        assert!(viewer.output().display_html().contains(COPY_CONTROL_CLASS));

        viewer.copy_formatted_html().unwrap();
        let html = clipboard.contents().unwrap();
        assert!(html.starts_with("<p>text</p>"));
        assert!(html.contains("language-js"));
        assert!(!html.contains(COPY_CONTROL_CLASS));
        assert_eq!(
            viewer.last_outcome().unwrap().message(),
            "Copied formatted text"
        );
    }

    #[test]
    fn test_empty_document_copies_succeed() {
        let clipboard = MemoryClipboard::new();
        let mut viewer = MarkdownViewer::new(Box::new(clipboard.clone()));
        for kind in CopyKind::ALL {
            viewer.copy(kind).unwrap();
            assert_eq!(clipboard.contents().as_deref(), Some(""));
        }
    }

    #[test]
    fn test_only_fence_plain_is_empty() {
        let (mut viewer, clipboard) = viewer_with("```\nonly code\n```");
        viewer.copy_plain_text().unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some(""));
    }

    #[test]
    fn test_copy_sees_latest_document() {
        let (mut viewer, clipboard) = viewer_with("first");
        viewer.set_document(MarkdownDocument::from("second"));
        viewer.copy_formatted_html().unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("<p>second</p>"));
        viewer.copy_original_text().unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("second"));
    }

    #[test]
    fn test_denied_clipboard_reports_failure() {
        let mut viewer = MarkdownViewer::new(Box::new(DeniedClipboard));
        viewer.set_document(MarkdownDocument::from("text"));

        let err = viewer.copy_plain_text().unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable(_)));
        let outcome = viewer.last_outcome().unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), COPY_FAILED_MESSAGE);

        // a failure leaves the viewer usable
        assert!(viewer.copy_original_text().is_err());
        assert_eq!(viewer.text_for(CopyKind::Original), "text");
    }

    #[test]
    fn test_text_for_matches_stateless_export() {
        let source = "Para *x*\n\n```sh\nls\n```\n";
        for policy in [PlainTextPolicy::StripFencedBlocks, PlainTextPolicy::FlattenRendered] {
            let (viewer, _) = viewer_with(source);
            let viewer = viewer.with_policy(policy);
            for kind in [CopyKind::Original, CopyKind::Plain, CopyKind::FormattedHtml] {
                assert_eq!(
                    viewer.text_for(kind),
                    export_text(kind, viewer.document(), viewer.output(), policy)
                );
            }
        }
    }

    #[test]
    fn test_palette_switch_rerenders() {
        let (mut viewer, _) = viewer_with("```js\nlet a;\n```");
        let light = viewer.output().display_html();
        viewer.set_palette(CodePalette::tomorrow());
        let dark = viewer.output().display_html();
        assert_ne!(light, dark);
        assert!(dark.contains("#2d2d2d"));
    }
}
