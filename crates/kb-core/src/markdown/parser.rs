//! Markdown parser: pulldown-cmark events to [`Block`] trees

use super::autolink::split_autolinks;
use super::highlight::Highlighter;
use super::model::*;
use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use tracing::debug;

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep raw HTML blocks and inline tags; dropped otherwise
    pub raw_html: bool,
    /// Turn bare `http(s)://` and `www.` URLs into links
    pub autolink: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            raw_html: false,
            autolink: true,
        }
    }
}

/// Parse markdown into blocks
///
/// Language-tagged fenced code is highlighted when a highlighter is given.
pub fn parse(source: &str, opts: ParseOptions, highlighter: Option<&Highlighter>) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let mut b = TreeBuilder::new(opts, highlighter);
    for event in Parser::new_ext(source, options) {
        b.handle(event);
    }
    b.finish()
}

#[derive(Debug)]
enum Container {
    Root,
    BlockQuote,
    Item { tight: bool },
    Footnote(String),
}

#[derive(Debug)]
enum InlineKind {
    /// `implicit` marks the bare text of a tight list item
    Paragraph { implicit: bool },
    Heading(u8),
    Emphasis,
    Strong,
    Strikethrough,
    Link { dest: String, title: String },
    Image { src: String, title: String },
    TableCell,
}

#[derive(Debug)]
enum Frame {
    Blocks {
        container: Container,
        blocks: Vec<Block>,
    },
    List {
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Inlines {
        kind: InlineKind,
        content: Vec<Inline>,
    },
    Code {
        language: Option<String>,
        text: String,
    },
    Table {
        table: Table,
        row: Vec<Vec<Inline>>,
    },
    HtmlBlock(String),
}

struct TreeBuilder<'h> {
    opts: ParseOptions,
    highlighter: Option<&'h Highlighter>,
    stack: Vec<Frame>,
    link_depth: usize,
    /// Adjacent text events are merged before autolinking
    pending_text: String,
}

impl<'h> TreeBuilder<'h> {
    fn new(opts: ParseOptions, highlighter: Option<&'h Highlighter>) -> Self {
        Self {
            opts,
            highlighter,
            stack: vec![Frame::Blocks {
                container: Container::Root,
                blocks: Vec::new(),
            }],
            link_depth: 0,
            pending_text: String::new(),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        if !matches!(event, Event::Text(_)) {
            self.flush_text();
        }
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push_inline(Inline::Code(code.to_string())),
            Event::Html(html) => match self.stack.last_mut() {
                Some(Frame::HtmlBlock(buf)) => buf.push_str(&html),
                _ => self.inline_html(&html),
            },
            Event::InlineHtml(html) => self.inline_html(&html),
            Event::SoftBreak => self.push_inline(Inline::SoftBreak),
            Event::HardBreak => self.push_inline(Inline::HardBreak),
            Event::Rule => {
                self.close_implicit();
                self.push_block(Block::ThematicBreak);
            }
            Event::FootnoteReference(label) => {
                self.push_inline(Inline::FootnoteReference(label.to_string()))
            }
            Event::TaskListMarker(checked) => self.push_inline(Inline::TaskMarker(checked)),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.close_implicit();
                self.open_inlines(InlineKind::Paragraph { implicit: false });
            }
            Tag::Heading { level, .. } => {
                self.close_implicit();
                self.open_inlines(InlineKind::Heading(level as u8));
            }
            Tag::BlockQuote(_) => {
                self.close_implicit();
                self.open_blocks(Container::BlockQuote);
            }
            Tag::CodeBlock(kind) => {
                self.close_implicit();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|lang| !lang.is_empty())
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.stack.push(Frame::Code {
                    language,
                    text: String::new(),
                });
            }
            Tag::HtmlBlock => {
                self.close_implicit();
                self.stack.push(Frame::HtmlBlock(String::new()));
            }
            Tag::List(start) => {
                self.close_implicit();
                self.stack.push(Frame::List {
                    start,
                    items: Vec::new(),
                });
            }
            Tag::Item => self.open_blocks(Container::Item { tight: false }),
            Tag::FootnoteDefinition(label) => {
                self.close_implicit();
                self.open_blocks(Container::Footnote(label.to_string()));
            }
            Tag::Table(aligns) => {
                self.close_implicit();
                let alignments = aligns
                    .into_iter()
                    .map(|a| match a {
                        Alignment::None => Align::None,
                        Alignment::Left => Align::Left,
                        Alignment::Center => Align::Center,
                        Alignment::Right => Align::Right,
                    })
                    .collect();
                self.stack.push(Frame::Table {
                    table: Table {
                        alignments,
                        ..Table::default()
                    },
                    row: Vec::new(),
                });
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(Frame::Table { row, .. }) = self.stack.last_mut() {
                    row.clear();
                }
            }
            Tag::TableCell => self.open_inlines(InlineKind::TableCell),
            Tag::Emphasis => self.open_inlines(InlineKind::Emphasis),
            Tag::Strong => self.open_inlines(InlineKind::Strong),
            Tag::Strikethrough => self.open_inlines(InlineKind::Strikethrough),
            Tag::Link {
                dest_url, title, ..
            } => {
                self.link_depth += 1;
                self.open_inlines(InlineKind::Link {
                    dest: dest_url.to_string(),
                    title: title.to_string(),
                });
            }
            Tag::Image {
                dest_url, title, ..
            } => self.open_inlines(InlineKind::Image {
                src: dest_url.to_string(),
                title: title.to_string(),
            }),
            other => debug!("Ignoring unsupported markdown tag: {:?}", other),
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading(_) => {
                if let Some((kind, content)) = self.pop_inlines() {
                    let block = match kind {
                        InlineKind::Heading(level) => Block::Heading { level, content },
                        _ => Block::Paragraph(content),
                    };
                    self.push_block(block);
                }
            }
            TagEnd::BlockQuote(_) => {
                self.close_implicit();
                if let Some((_, blocks)) = self.pop_blocks() {
                    self.push_block(Block::BlockQuote(blocks));
                }
            }
            TagEnd::FootnoteDefinition => {
                self.close_implicit();
                if let Some((Container::Footnote(label), blocks)) = self.pop_blocks() {
                    self.push_block(Block::FootnoteDefinition { label, blocks });
                }
            }
            TagEnd::CodeBlock => {
                if let Some(Frame::Code { language, mut text }) = self.stack.pop() {
                    if text.ends_with('\n') {
                        text.pop();
                    }
                    let highlighted = match (&language, self.highlighter) {
                        (Some(lang), Some(h)) => Some(h.highlight(&text, lang)),
                        _ => None,
                    };
                    self.push_block(Block::CodeBlock(CodeBlock {
                        language,
                        text,
                        highlighted,
                    }));
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(Frame::HtmlBlock(html)) = self.stack.pop() {
                    if self.opts.raw_html {
                        self.push_block(Block::Html(html));
                    } else {
                        debug!("Dropping raw HTML block ({} bytes)", html.len());
                    }
                }
            }
            TagEnd::Item => {
                self.close_implicit();
                if let Some((Container::Item { tight }, blocks)) = self.pop_blocks() {
                    if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                        items.push(ListItem { blocks, tight });
                    }
                }
            }
            TagEnd::List(_) => {
                if let Some(Frame::List { start, items }) = self.stack.pop() {
                    self.push_block(Block::List(List { start, items }));
                }
            }
            TagEnd::TableCell => {
                if let Some((_, content)) = self.pop_inlines() {
                    if let Some(Frame::Table { row, .. }) = self.stack.last_mut() {
                        row.push(content);
                    }
                }
            }
            TagEnd::TableHead => {
                if let Some(Frame::Table { table, row }) = self.stack.last_mut() {
                    table.head = std::mem::take(row);
                }
            }
            TagEnd::TableRow => {
                if let Some(Frame::Table { table, row }) = self.stack.last_mut() {
                    table.rows.push(std::mem::take(row));
                }
            }
            TagEnd::Table => {
                if let Some(Frame::Table { table, .. }) = self.stack.pop() {
                    self.push_block(Block::Table(table));
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image => {
                let Some((kind, content)) = self.pop_inlines() else {
                    return;
                };
                let inline = match kind {
                    InlineKind::Emphasis => Inline::Emphasis(content),
                    InlineKind::Strong => Inline::Strong(content),
                    InlineKind::Strikethrough => Inline::Strikethrough(content),
                    InlineKind::Link { dest, title } => {
                        self.link_depth = self.link_depth.saturating_sub(1);
                        Inline::Link {
                            dest,
                            title,
                            content,
                        }
                    }
                    InlineKind::Image { src, title } => Inline::Image {
                        src,
                        title,
                        alt: inline_text(&content),
                    },
                    _ => return,
                };
                self.push_inline(inline);
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        match self.stack.last_mut() {
            Some(Frame::Code { text: buf, .. }) | Some(Frame::HtmlBlock(buf)) => {
                buf.push_str(text);
                return;
            }
            _ => {}
        }

        self.pending_text.push_str(text);
    }

    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);
        if self.opts.autolink && self.link_depth == 0 {
            for inline in split_autolinks(&text) {
                self.push_inline(inline);
            }
        } else {
            self.push_inline(Inline::Text(text));
        }
    }

    fn inline_html(&mut self, html: &str) {
        if self.opts.raw_html {
            self.push_inline(Inline::Html(html.to_string()));
        }
    }

    fn open_blocks(&mut self, container: Container) {
        self.stack.push(Frame::Blocks {
            container,
            blocks: Vec::new(),
        });
    }

    fn open_inlines(&mut self, kind: InlineKind) {
        self.stack.push(Frame::Inlines {
            kind,
            content: Vec::new(),
        });
    }

    fn pop_inlines(&mut self) -> Option<(InlineKind, Vec<Inline>)> {
        match self.stack.pop() {
            Some(Frame::Inlines { kind, content }) => Some((kind, content)),
            Some(other) => {
                debug!("Unbalanced inline end, found {:?}", other);
                self.stack.push(other);
                None
            }
            None => None,
        }
    }

    fn pop_blocks(&mut self) -> Option<(Container, Vec<Block>)> {
        match self.stack.pop() {
            Some(Frame::Blocks {
                container: Container::Root,
                blocks,
            }) => {
                self.stack.push(Frame::Blocks {
                    container: Container::Root,
                    blocks,
                });
                None
            }
            Some(Frame::Blocks { container, blocks }) => Some((container, blocks)),
            Some(other) => {
                debug!("Unbalanced block end, found {:?}", other);
                self.stack.push(other);
                None
            }
            None => None,
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        if let Some(Frame::Blocks { .. }) = self.stack.last() {
            self.open_inlines(InlineKind::Paragraph { implicit: true });
        }
        match self.stack.last_mut() {
            Some(Frame::Inlines { content, .. }) => content.push(inline),
            _ => debug!("Dropping inline outside of a text container: {:?}", inline),
        }
    }

    fn push_block(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(Frame::Blocks { blocks, .. }) => blocks.push(block),
            _ => debug!("Dropping block outside of a block container: {:?}", block),
        }
    }

    /// Close the bare-text paragraph of a tight list item, if one is open
    fn close_implicit(&mut self) {
        if !matches!(
            self.stack.last(),
            Some(Frame::Inlines {
                kind: InlineKind::Paragraph { implicit: true },
                ..
            })
        ) {
            return;
        }
        if let Some((_, content)) = self.pop_inlines() {
            if let Some(Frame::Blocks {
                container: Container::Item { tight },
                ..
            }) = self.stack.last_mut()
            {
                *tight = true;
            }
            self.push_block(Block::Paragraph(content));
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_text();
        self.close_implicit();
        while self.stack.len() > 1 {
            debug!("Unclosed frame at end of input: {:?}", self.stack.last());
            self.stack.pop();
        }
        match self.stack.pop() {
            Some(Frame::Blocks { blocks, .. }) => blocks,
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_plain(source: &str) -> Vec<Block> {
        parse(source, ParseOptions::default(), None)
    }

    #[test]
    fn test_empty_source() {
        assert!(parse_plain("").is_empty());
    }

    #[test]
    fn test_bold_paragraph() {
        assert_eq!(
            parse_plain("**bold**"),
            vec![Block::Paragraph(vec![Inline::Strong(vec![Inline::Text(
                "bold".into()
            )])])]
        );
    }

    #[test]
    fn test_heading_levels() {
        let blocks = parse_plain("# One\n\n### Three");
        assert!(matches!(&blocks[0], Block::Heading { level: 1, .. }));
        assert!(matches!(&blocks[1], Block::Heading { level: 3, .. }));
    }

    #[test]
    fn test_fenced_code_strips_trailing_newline() {
        let blocks = parse_plain("```js\nconst x=1;\n```");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock(CodeBlock {
                language: Some("js".into()),
                text: "const x=1;".into(),
                highlighted: None,
            })]
        );
    }

    #[test]
    fn test_fenced_code_is_highlighted_with_highlighter() {
        let h = Highlighter::new();
        let blocks = parse("```js\nconst x=1;\n```", ParseOptions::default(), Some(&h));
        let Block::CodeBlock(code) = &blocks[0] else {
            panic!("expected code block, got {:?}", blocks[0]);
        };
        assert_eq!(code.language.as_deref(), Some("js"));
        let highlighted = code.highlighted.as_ref().unwrap();
        assert_eq!(highlighted.text(), "const x=1;");
    }

    #[test]
    fn test_untagged_code_not_highlighted() {
        let h = Highlighter::new();
        let blocks = parse("```\nplain\n```\n\n    indented\n", ParseOptions::default(), Some(&h));
        assert_eq!(blocks.len(), 2);
        for block in blocks {
            let Block::CodeBlock(code) = block else {
                panic!("expected code block");
            };
            assert!(code.language.is_none());
            assert!(code.highlighted.is_none());
        }
    }

    #[test]
    fn test_info_string_takes_first_word() {
        let blocks = parse_plain("```rust ignore\nfn f() {}\n```");
        let Block::CodeBlock(code) = &blocks[0] else {
            panic!("expected code block");
        };
        assert_eq!(code.language.as_deref(), Some("rust"));
    }

    #[test]
    fn test_tight_and_loose_lists() {
        let blocks = parse_plain("- a\n- b\n\n1. x\n\n2. y\n");
        let Block::List(tight) = &blocks[0] else {
            panic!("expected list");
        };
        assert!(!tight.is_ordered());
        assert_eq!(tight.items.len(), 2);
        assert!(tight.items.iter().all(|i| i.tight));

        let Block::List(loose) = &blocks[1] else {
            panic!("expected list");
        };
        assert_eq!(loose.start, Some(1));
        assert!(loose.items.iter().all(|i| !i.tight));
    }

    #[test]
    fn test_task_list() {
        let blocks = parse_plain("- [x] done\n- [ ] todo\n");
        let Block::List(list) = &blocks[0] else {
            panic!("expected list");
        };
        let Block::Paragraph(first) = &list.items[0].blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(first[0], Inline::TaskMarker(true));
    }

    #[test]
    fn test_table() {
        let blocks = parse_plain("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        let Block::Table(table) = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.alignments, vec![Align::Left, Align::Right]);
        assert_eq!(table.head.len(), 2);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(inline_text(&table.rows[0][1]), "2");
    }

    #[test]
    fn test_strikethrough() {
        let blocks = parse_plain("~~gone~~");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![Inline::Strikethrough(vec![
                Inline::Text("gone".into())
            ])])]
        );
    }

    #[test]
    fn test_autolink_in_text_but_not_in_link() {
        let blocks = parse_plain("go to https://example.com now\n\n[https://a.io](https://b.io)");
        let Block::Paragraph(first) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(matches!(&first[1], Inline::Link { dest, .. } if dest == "https://example.com"));

        let Block::Paragraph(second) = &blocks[1] else {
            panic!("expected paragraph");
        };
        assert_eq!(second.len(), 1);
        assert!(matches!(&second[0], Inline::Link { dest, .. } if dest == "https://b.io"));
    }

    #[test]
    fn test_raw_html_policy() {
        let source = "<div class=\"note\">hi</div>\n\ntext <b>bold</b>";
        let dropped = parse_plain(source);
        assert_eq!(dropped.len(), 1);

        let kept = parse(
            source,
            ParseOptions {
                raw_html: true,
                autolink: true,
            },
            None,
        );
        assert!(matches!(&kept[0], Block::Html(html) if html.contains("class=\"note\"")));
        let Block::Paragraph(inlines) = &kept[1] else {
            panic!("expected paragraph");
        };
        assert!(inlines.contains(&Inline::Html("<b>".into())));
    }

    #[test]
    fn test_blockquote_nesting() {
        let blocks = parse_plain("> quoted\n>\n> - item\n");
        let Block::BlockQuote(inner) = &blocks[0] else {
            panic!("expected blockquote");
        };
        assert!(matches!(inner[0], Block::Paragraph(_)));
        assert!(matches!(inner[1], Block::List(_)));
    }

    #[test]
    fn test_footnotes() {
        let blocks = parse_plain("text[^1]\n\n[^1]: note\n");
        let Block::Paragraph(inlines) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(inlines.contains(&Inline::FootnoteReference("1".into())));
        assert!(matches!(&blocks[1], Block::FootnoteDefinition { label, .. } if label == "1"));
    }
}
