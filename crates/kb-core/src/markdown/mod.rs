//! Markdown rendering: source text to blocks to a displayable DOM

mod autolink;
pub mod dom;
pub mod highlight;
pub mod model;
pub mod parser;

pub use dom::{DomBuilder, Element, Node, COPY_CONTROL_CLASS, ROOT_CLASS};
pub use highlight::{
    CodePalette, HighlightedCode, HighlightedLine, Highlighter, Rgb, Token, TokenKind, TokenStyle,
};
pub use model::{inline_text, Align, Block, CodeBlock, Inline, List, ListItem, Table};
pub use parser::{parse, ParseOptions};

use crate::types::MarkdownDocument;
use tracing::debug;

/// Renderer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub parse: ParseOptions,
    /// Highlight language-tagged fenced code
    pub highlight: bool,
    /// Attach copy controls to code blocks in the displayed tree
    pub copy_controls: bool,
    pub palette: CodePalette,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            highlight: true,
            copy_controls: true,
            palette: CodePalette::light(),
        }
    }
}

/// Result of rendering one document
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedOutput {
    blocks: Vec<Block>,
    dom: Node,
}

impl RenderedOutput {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Displayed tree, copy controls included
    pub fn dom(&self) -> &Node {
        &self.dom
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The displayed tree with every copy control removed
    pub fn exportable_dom(&self) -> Node {
        let mut dom = self.dom.clone();
        let removed = dom.prune(&|el| el.is_copy_control());
        debug!("Pruned {} copy controls", removed);
        dom
    }

    /// Text content of the rendered document, copy controls excluded
    pub fn text_content(&self) -> String {
        self.exportable_dom().text_content()
    }

    /// Markup of the container's contents as displayed
    pub fn display_html(&self) -> String {
        inner_html(&self.dom)
    }

    /// Markup of the container's contents with copy controls pruned
    pub fn export_html(&self) -> String {
        inner_html(&self.exportable_dom())
    }
}

fn inner_html(node: &Node) -> String {
    match node {
        Node::Element(el) => el.inner_html(),
        other => other.to_html(),
    }
}

/// Renders markdown documents
///
/// Holds the loaded grammars; construct once and reuse.
pub struct MarkdownRenderer {
    options: RenderOptions,
    highlighter: Highlighter,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            options,
            highlighter: Highlighter::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Switch the code palette, e.g. when the theme changes
    pub fn set_palette(&mut self, palette: CodePalette) {
        self.options.palette = palette;
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Render a document. Pure: the same source always yields the same output.
    pub fn render(&self, document: &MarkdownDocument) -> RenderedOutput {
        let highlighter = self.options.highlight.then_some(&self.highlighter);
        let blocks = parse(document.source(), self.options.parse, highlighter);
        let dom = DomBuilder::new(&self.options.palette)
            .with_copy_controls(self.options.copy_controls)
            .build(&blocks);
        debug!(
            "Rendered {} bytes into {} blocks",
            document.len(),
            blocks.len()
        );
        RenderedOutput { blocks, dom }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
