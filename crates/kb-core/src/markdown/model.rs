//! Block and inline node types produced by the parser

use super::highlight::HighlightedCode;

/// Table column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

impl Align {
    /// CSS `text-align` value, if any
    pub fn css(&self) -> Option<&'static str> {
        match self {
            Align::None => None,
            Align::Left => Some("left"),
            Align::Center => Some("center"),
            Align::Right => Some("right"),
        }
    }
}

/// A block-level node
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    CodeBlock(CodeBlock),
    BlockQuote(Vec<Block>),
    List(List),
    Table(Table),
    ThematicBreak,
    /// Raw HTML block, only produced when raw markup is enabled
    Html(String),
    FootnoteDefinition { label: String, blocks: Vec<Block> },
}

/// An inline node
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    /// Inline code; never highlighted
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link {
        dest: String,
        title: String,
        content: Vec<Inline>,
    },
    Image {
        src: String,
        title: String,
        alt: String,
    },
    SoftBreak,
    HardBreak,
    /// Raw inline HTML, only produced when raw markup is enabled
    Html(String),
    TaskMarker(bool),
    FootnoteReference(String),
}

/// A fenced or indented code block
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Language tag of a fenced block (first word of the info string)
    pub language: Option<String>,
    /// Code text with the trailing newline stripped
    pub text: String,
    /// Highlighted tokens; present only for language-tagged blocks
    pub highlighted: Option<HighlightedCode>,
}

impl CodeBlock {
    pub fn is_highlighted(&self) -> bool {
        self.highlighted.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    /// Start number of an ordered list
    pub start: Option<u64>,
    pub items: Vec<ListItem>,
}

impl List {
    pub fn is_ordered(&self) -> bool {
        self.start.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    pub blocks: Vec<Block>,
    /// Bare-text item of a tight list; paragraphs render without `<p>`
    pub tight: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub alignments: Vec<Align>,
    pub head: Vec<Vec<Inline>>,
    pub rows: Vec<Vec<Vec<Inline>>>,
}

/// Concatenated text of inline nodes, markup removed
pub fn inline_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_inline_text(inlines, &mut out);
    out
}

fn push_inline_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(t) | Inline::Code(t) => out.push_str(t),
            Inline::Emphasis(c) | Inline::Strong(c) | Inline::Strikethrough(c) => {
                push_inline_text(c, out)
            }
            Inline::Link { content, .. } => push_inline_text(content, out),
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::SoftBreak | Inline::HardBreak => out.push('\n'),
            Inline::Html(_) | Inline::TaskMarker(_) | Inline::FootnoteReference(_) => {}
        }
    }
}
