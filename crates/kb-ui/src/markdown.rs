//! Rendered markdown blocks to terminal lines

use crate::highlight::{line_spans, plain_line};
use crate::theme::{color, UiTheme};
use kb_core::markdown::{inline_text, Block, CodeBlock, CodePalette, Inline, List, Table};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// Converts blocks into styled lines
pub struct LineRenderer<'a> {
    theme: &'a UiTheme,
    palette: &'a CodePalette,
    lines: Vec<Line<'static>>,
}

impl<'a> LineRenderer<'a> {
    pub fn new(theme: &'a UiTheme, palette: &'a CodePalette) -> Self {
        Self {
            theme,
            palette,
            lines: Vec::new(),
        }
    }

    /// Render all blocks, separated by blank lines
    pub fn render(mut self, blocks: &[Block]) -> Vec<Line<'static>> {
        self.blocks(blocks, "");
        self.lines
    }

    fn blocks(&mut self, blocks: &[Block], prefix: &str) {
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                self.push(prefix, Vec::new());
            }
            self.block(block, prefix);
        }
    }

    fn block(&mut self, block: &Block, prefix: &str) {
        match block {
            Block::Heading { level, content } => {
                let style = Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD);
                let mut spans = vec![Span::styled(
                    format!("{} ", "#".repeat(*level as usize)),
                    style,
                )];
                spans.extend(self.inlines(content, style));
                self.push(prefix, spans);
            }
            Block::Paragraph(content) => self.paragraph(content, prefix),
            Block::CodeBlock(code) => self.code_block(code, prefix),
            Block::BlockQuote(inner) => self.blocks(inner, &format!("{}│ ", prefix)),
            Block::List(list) => self.list(list, prefix),
            Block::Table(table) => self.table(table, prefix),
            Block::ThematicBreak => {
                let rule = Span::styled("─".repeat(40), Style::default().fg(self.theme.muted));
                self.push(prefix, vec![rule]);
            }
            Block::Html(html) => {
                for line in html.lines() {
                    let span = Span::styled(line.to_string(), Style::default().fg(self.theme.muted));
                    self.push(prefix, vec![span]);
                }
            }
            Block::FootnoteDefinition { label, blocks } => {
                let marker = Span::styled(
                    format!("[^{}]:", label),
                    Style::default().fg(self.theme.muted),
                );
                self.push(prefix, vec![marker]);
                self.blocks(blocks, &format!("{}    ", prefix));
            }
        }
    }

    /// Split paragraph content on line breaks
    fn paragraph(&mut self, content: &[Inline], prefix: &str) {
        let mut current = Vec::new();
        for inline in content {
            match inline {
                Inline::SoftBreak | Inline::HardBreak => {
                    let spans = self.inlines(&current, self.theme.base());
                    self.push(prefix, spans);
                    current.clear();
                }
                other => current.push(other.clone()),
            }
        }
        let spans = self.inlines(&current, self.theme.base());
        self.push(prefix, spans);
    }

    fn code_block(&mut self, code: &CodeBlock, prefix: &str) {
        let border = Style::default().fg(color(self.palette.border));
        let label = code.language.as_deref().unwrap_or("text");
        self.push(prefix, vec![Span::styled(format!("┌─ {} ", label), border)]);

        match &code.highlighted {
            Some(highlighted) => {
                for line in &highlighted.lines {
                    let mut spans = vec![Span::styled("│ ", border)];
                    spans.extend(line_spans(line, self.palette));
                    self.push(prefix, spans);
                }
            }
            None => {
                for text in code.text.split('\n') {
                    let mut spans = vec![Span::styled("│ ", border)];
                    spans.extend(plain_line(text, self.palette).spans);
                    self.push(prefix, spans);
                }
            }
        }
        self.push(prefix, vec![Span::styled("└─", border)]);
    }

    fn list(&mut self, list: &List, prefix: &str) {
        for (i, item) in list.items.iter().enumerate() {
            let marker = match list.start {
                Some(start) => format!("{}. ", start + i as u64),
                None => "• ".to_string(),
            };
            let indent = format!("{}{}", prefix, " ".repeat(marker.chars().count()));
            let first = self.lines.len();
            for (j, block) in item.blocks.iter().enumerate() {
                if j > 0 && !item.tight {
                    self.push(&indent, Vec::new());
                }
                self.block(block, &indent);
            }
            if self.lines.len() == first {
                self.push(&indent, Vec::new());
            }
            // Swap the indent of the item's first line for its marker
            if let Some(line) = self.lines.get_mut(first) {
                if let Some(span) = line.spans.first_mut() {
                    if let Some(rest) = span.content.strip_prefix(indent.as_str()) {
                        *span = Span::raw(format!("{}{}{}", prefix, marker, rest));
                    }
                }
            }
        }
    }

    fn table(&mut self, table: &Table, prefix: &str) {
        let head: Vec<String> = table.head.iter().map(|c| inline_text(c)).collect();
        let rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|r| r.iter().map(|c| inline_text(c)).collect())
            .collect();

        let columns = head.len().max(rows.iter().map(Vec::len).max().unwrap_or(0));
        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&head).chain(rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let format_row = |row: &[String]| -> String {
            (0..columns)
                .map(|i| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    let pad = widths[i].saturating_sub(cell.chars().count());
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join(" │ ")
        };

        let bold = Style::default().add_modifier(Modifier::BOLD);
        self.push(prefix, vec![Span::styled(format_row(&head), bold)]);
        let rule = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.push(prefix, vec![Span::styled(rule, Style::default().fg(self.theme.muted))]);
        for row in &rows {
            self.push(prefix, vec![Span::raw(format_row(row))]);
        }
    }

    fn inlines(&self, inlines: &[Inline], style: Style) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        self.push_inlines(inlines, style, &mut spans);
        spans
    }

    fn push_inlines(&self, inlines: &[Inline], style: Style, out: &mut Vec<Span<'static>>) {
        for inline in inlines {
            match inline {
                Inline::Text(text) => out.push(Span::styled(text.clone(), style)),
                Inline::Code(code) => {
                    out.push(Span::styled(code.clone(), style.fg(self.theme.code)))
                }
                Inline::Emphasis(c) => {
                    self.push_inlines(c, style.add_modifier(Modifier::ITALIC), out)
                }
                Inline::Strong(c) => self.push_inlines(c, style.add_modifier(Modifier::BOLD), out),
                Inline::Strikethrough(c) => {
                    self.push_inlines(c, style.add_modifier(Modifier::CROSSED_OUT), out)
                }
                Inline::Link { content, .. } => self.push_inlines(
                    content,
                    style.fg(self.theme.link).add_modifier(Modifier::UNDERLINED),
                    out,
                ),
                Inline::Image { alt, src, .. } => {
                    let label = if alt.is_empty() { src } else { alt };
                    out.push(Span::styled(format!("[image: {}]", label), style.fg(self.theme.muted)))
                }
                Inline::SoftBreak => out.push(Span::styled(" ", style)),
                Inline::HardBreak => {}
                Inline::Html(html) => out.push(Span::styled(html.clone(), style.fg(self.theme.muted))),
                Inline::TaskMarker(done) => {
                    out.push(Span::styled(if *done { "[x] " } else { "[ ] " }, style))
                }
                Inline::FootnoteReference(label) => out.push(Span::styled(
                    format!("[^{}]", label),
                    style.fg(self.theme.muted),
                )),
            }
        }
    }

    fn push(&mut self, prefix: &str, spans: Vec<Span<'static>>) {
        let mut line = Vec::with_capacity(spans.len() + 1);
        if !prefix.is_empty() {
            line.push(Span::raw(prefix.to_string()));
        }
        line.extend(spans);
        self.lines.push(Line::from(line));
    }
}

/// Render blocks with the given colours
pub fn render_blocks(blocks: &[Block], theme: &UiTheme, palette: &CodePalette) -> Vec<Line<'static>> {
    LineRenderer::new(theme, palette).render(blocks)
}
