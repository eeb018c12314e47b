//! DOM-like tree for rendered markdown
//!
//! The tree is what a viewer displays. It can be queried, pruned and
//! serialized back to markup. Copy controls (elements with the
//! [`COPY_CONTROL_CLASS`] class) exist only for display and are pruned before
//! anything is exported.

use super::highlight::{CodePalette, HighlightedCode, TokenKind};
use super::model::{Block, CodeBlock, Inline, List, Table};

/// Class marking UI-only copy affordances
pub const COPY_CONTROL_CLASS: &str = "copy-button";

/// Class of the root container
pub const ROOT_CLASS: &str = "markdown-content";

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// A node of the rendered tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Embedded markup passed through verbatim
    Raw(String),
}

/// An element with attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Builder: append a child
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Builder: append children
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Whether this element is a UI-only copy control
    pub fn is_copy_control(&self) -> bool {
        self.has_class(COPY_CONTROL_CLASS)
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    /// Serialize only the children (`innerHTML`)
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Serialize to markup (`outerHTML`)
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Raw(raw) => out.push_str(raw),
            Node::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&html_escape::encode_double_quoted_attribute(value));
                        out.push('"');
                    }
                }
                out.push('>');
                if el.is_void() {
                    return;
                }
                for child in &el.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }

    /// Concatenated text of all descendants (`textContent`)
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Raw(raw) => out.push_str(&strip_tags(raw)),
            Node::Element(el) => {
                for child in &el.children {
                    child.write_text(out);
                }
            }
        }
    }

    /// Remove every descendant element matching `pred`; returns how many
    pub fn prune(&mut self, pred: &dyn Fn(&Element) -> bool) -> usize {
        let Node::Element(el) = self else {
            return 0;
        };
        let before = el.children.len();
        el.children
            .retain(|child| !matches!(child, Node::Element(e) if pred(e)));
        let mut removed = before - el.children.len();
        for child in &mut el.children {
            removed += child.prune(pred);
        }
        removed
    }

    /// All descendant elements (self included) matching `pred`, document order
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect(pred, &mut found);
        found
    }

    fn collect<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        if let Node::Element(el) = self {
            if pred(el) {
                found.push(el);
            }
            for child in &el.children {
                child.collect(pred, found);
            }
        }
    }
}

/// Text of embedded markup: tags removed, entities decoded
fn strip_tags(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    html_escape::decode_html_entities(&text).into_owned()
}

/// Builds the displayed tree from parsed blocks
pub struct DomBuilder<'p> {
    palette: &'p CodePalette,
    copy_controls: bool,
}

impl<'p> DomBuilder<'p> {
    pub fn new(palette: &'p CodePalette) -> Self {
        Self {
            palette,
            copy_controls: true,
        }
    }

    /// Attach copy controls to code blocks
    pub fn with_copy_controls(mut self, enabled: bool) -> Self {
        self.copy_controls = enabled;
        self
    }

    /// Root container holding all blocks
    pub fn build(&self, blocks: &[Block]) -> Node {
        Element::new("div")
            .attr("class", ROOT_CLASS)
            .attr("style", "font-size: 16px; line-height: 1.6")
            .children(self.blocks(blocks))
            .into()
    }

    /// Blocks separated by newline text nodes
    fn blocks(&self, blocks: &[Block]) -> Vec<Node> {
        let mut nodes = Vec::with_capacity(blocks.len() * 2);
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                nodes.push(Node::text("\n"));
            }
            nodes.push(self.block(block));
        }
        nodes
    }

    fn block(&self, block: &Block) -> Node {
        match block {
            Block::Heading { level, content } => Element::new(format!("h{}", level))
                .children(self.inlines(content))
                .into(),
            Block::Paragraph(content) => Element::new("p").children(self.inlines(content)).into(),
            Block::CodeBlock(code) => self.code_block(code),
            Block::BlockQuote(blocks) => Element::new("blockquote")
                .child(Node::text("\n"))
                .children(self.blocks(blocks))
                .child(Node::text("\n"))
                .into(),
            Block::List(list) => self.list(list),
            Block::Table(table) => self.table(table),
            Block::ThematicBreak => Element::new("hr").into(),
            Block::Html(html) => Node::Raw(html.clone()),
            Block::FootnoteDefinition { label, blocks } => Element::new("div")
                .attr("class", "footnote-definition")
                .attr("id", format!("fn-{}", label))
                .child(
                    Element::new("sup")
                        .attr("class", "footnote-label")
                        .child(Node::text(label.clone())),
                )
                .children(self.blocks(blocks))
                .into(),
        }
    }

    fn code_block(&self, code: &CodeBlock) -> Node {
        let mut wrapper = Element::new("div").attr("class", "code-block");
        if let Some(lang) = &code.language {
            wrapper = wrapper.attr("data-language", lang.clone());
        }
        if self.copy_controls {
            wrapper = wrapper.child(
                Element::new("button")
                    .attr("class", COPY_CONTROL_CLASS)
                    .attr("type", "button")
                    .child(Node::text("Copy")),
            );
        }

        let pre = match (&code.language, &code.highlighted) {
            (Some(lang), Some(highlighted)) => {
                let class = format!("language-{}", lang);
                Element::new("pre")
                    .attr("class", class.clone())
                    .attr("style", self.pre_style())
                    .child(
                        Element::new("code")
                            .attr("class", class)
                            .children(self.highlighted(highlighted)),
                    )
            }
            (Some(lang), None) => {
                let class = format!("language-{}", lang);
                Element::new("pre").child(
                    Element::new("code")
                        .attr("class", class)
                        .child(Node::text(code.text.clone())),
                )
            }
            (None, _) => Element::new("pre")
                .child(Element::new("code").child(Node::text(code.text.clone()))),
        };

        wrapper.child(pre).into()
    }

    fn pre_style(&self) -> String {
        format!(
            "margin: 16px 0; padding: 15px; background-color: {}; border: 1px solid {}; \
             border-radius: 6px; font-size: 14px; line-height: 1.5; overflow: auto; color: {}",
            self.palette.background.hex(),
            self.palette.border.hex(),
            self.palette.foreground.hex(),
        )
    }

    fn highlighted(&self, code: &HighlightedCode) -> Vec<Node> {
        let mut nodes = Vec::new();
        for (i, line) in code.lines.iter().enumerate() {
            if i > 0 {
                nodes.push(Node::text("\n"));
            }
            for token in &line.tokens {
                if token.kind == TokenKind::Plain {
                    nodes.push(Node::text(token.text.clone()));
                    continue;
                }
                nodes.push(
                    Element::new("span")
                        .attr("class", format!("token {}", token.kind.class_name()))
                        .attr("style", self.palette.style(token.kind).css())
                        .child(Node::text(token.text.clone()))
                        .into(),
                );
            }
        }
        nodes
    }

    fn list(&self, list: &List) -> Node {
        let mut el = match list.start {
            Some(1) => Element::new("ol"),
            Some(n) => Element::new("ol").attr("start", n.to_string()),
            None => Element::new("ul"),
        };
        el = el.child(Node::text("\n"));
        for item in &list.items {
            let is_task = matches!(
                item.blocks.first(),
                Some(Block::Paragraph(inlines)) if matches!(inlines.first(), Some(Inline::TaskMarker(_)))
            );
            let mut li = Element::new("li");
            if is_task {
                li = li.attr("class", "task-list-item");
            }
            if item.tight {
                for (i, block) in item.blocks.iter().enumerate() {
                    if i > 0 {
                        li = li.child(Node::text("\n"));
                    }
                    li = match block {
                        Block::Paragraph(inlines) => li.children(self.inlines(inlines)),
                        other => li.child(self.block(other)),
                    };
                }
            } else {
                li = li
                    .child(Node::text("\n"))
                    .children(self.blocks(&item.blocks))
                    .child(Node::text("\n"));
            }
            el = el.child(li).child(Node::text("\n"));
        }
        el.into()
    }

    fn table(&self, table: &Table) -> Node {
        let cell = |tag: &str, col: usize, content: &[Inline]| -> Node {
            let mut el = Element::new(tag);
            if let Some(align) = table.alignments.get(col).and_then(|a| a.css()) {
                el = el.attr("style", format!("text-align: {}", align));
            }
            el.children(self.inlines(content)).into()
        };

        let head_row = Element::new("tr").children(
            table
                .head
                .iter()
                .enumerate()
                .map(|(i, c)| cell("th", i, c)),
        );
        let body = Element::new("tbody").children(table.rows.iter().map(|row| {
            Element::new("tr")
                .children(row.iter().enumerate().map(|(i, c)| cell("td", i, c)))
                .into()
        }));

        let mut el = Element::new("table").child(Element::new("thead").child(head_row));
        if !table.rows.is_empty() {
            el = el.child(body);
        }
        el.into()
    }

    fn inlines(&self, inlines: &[Inline]) -> Vec<Node> {
        inlines.iter().flat_map(|i| self.inline(i)).collect()
    }

    fn inline(&self, inline: &Inline) -> Vec<Node> {
        let node: Node = match inline {
            Inline::Text(text) => Node::text(text.clone()),
            Inline::Code(code) => Element::new("code").child(Node::text(code.clone())).into(),
            Inline::Emphasis(c) => Element::new("em").children(self.inlines(c)).into(),
            Inline::Strong(c) => Element::new("strong").children(self.inlines(c)).into(),
            Inline::Strikethrough(c) => Element::new("del").children(self.inlines(c)).into(),
            Inline::Link {
                dest,
                title,
                content,
            } => {
                let mut a = Element::new("a").attr("href", dest.clone());
                if !title.is_empty() {
                    a = a.attr("title", title.clone());
                }
                a.children(self.inlines(content)).into()
            }
            Inline::Image { src, title, alt } => {
                let mut img = Element::new("img")
                    .attr("src", src.clone())
                    .attr("alt", alt.clone());
                if !title.is_empty() {
                    img = img.attr("title", title.clone());
                }
                img.into()
            }
            Inline::SoftBreak => Node::text("\n"),
            Inline::HardBreak => return vec![Element::new("br").into(), Node::text("\n")],
            Inline::Html(html) => Node::Raw(html.clone()),
            Inline::TaskMarker(checked) => {
                let mut input = Element::new("input")
                    .attr("type", "checkbox")
                    .attr("disabled", "");
                if *checked {
                    input = input.attr("checked", "");
                }
                input.into()
            }
            Inline::FootnoteReference(label) => Element::new("sup")
                .attr("class", "footnote-ref")
                .child(
                    Element::new("a")
                        .attr("href", format!("#fn-{}", label))
                        .child(Node::text(label.clone())),
                )
                .into(),
        };
        vec![node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parser::{parse, ParseOptions};
    use pretty_assertions::assert_eq;

    fn build(source: &str) -> Node {
        let palette = CodePalette::light();
        let blocks = parse(source, ParseOptions::default(), None);
        DomBuilder::new(&palette).build(&blocks)
    }

    fn inner(node: &Node) -> String {
        node.as_element().unwrap().inner_html()
    }

    #[test]
    fn test_paragraph_markup() {
        let dom = build("Hello *world* & **you**");
        assert_eq!(
            inner(&dom),
            "<p>Hello <em>world</em> &amp; <strong>you</strong></p>"
        );
    }

    #[test]
    fn test_text_content_of_bold() {
        let dom = build("**bold**");
        assert_eq!(dom.text_content(), "bold");
        assert_eq!(dom.find_all(&|e| e.tag == "strong").len(), 1);
    }

    #[test]
    fn test_blocks_separated_by_newlines() {
        let dom = build("# T\n\npara");
        assert_eq!(inner(&dom), "<h1>T</h1>\n<p>para</p>");
    }

    #[test]
    fn test_code_block_has_copy_control() {
        let dom = build("```\nx\n```");
        let controls = dom.find_all(&|e| e.is_copy_control());
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0].tag, "button");
    }

    #[test]
    fn test_prune_removes_controls() {
        let mut dom = build("```\nx\n```\n\n```\ny\n```");
        assert_eq!(dom.prune(&|e| e.is_copy_control()), 2);
        assert!(dom.find_all(&|e| e.is_copy_control()).is_empty());
        assert!(!dom.to_html().contains(COPY_CONTROL_CLASS));
    }

    #[test]
    fn test_void_elements() {
        let dom = build("a  \nb\n\n---\n\n![alt](i.png)");
        let html = inner(&dom);
        assert!(html.contains("<br>\n"));
        assert!(html.contains("<hr>"));
        assert!(html.contains("<img src=\"i.png\" alt=\"alt\">"));
        assert!(!html.contains("</img>"));
    }

    #[test]
    fn test_attribute_escaping() {
        let dom = build("[x](http://a.io/?q=\"1\"&b=2)");
        let html = inner(&dom);
        assert!(html.contains("href=\"http://a.io/?q=&quot;1&quot;&amp;b=2\""));
    }

    #[test]
    fn test_task_list_markup() {
        let dom = build("- [x] done");
        let html = inner(&dom);
        assert!(html.contains("<li class=\"task-list-item\"><input type=\"checkbox\" disabled checked>"));
    }

    #[test]
    fn test_table_markup() {
        let dom = build("| a |\n|:-:|\n| 1 |");
        let html = inner(&dom);
        assert!(html.contains("<th style=\"text-align: center\">a</th>"));
        assert!(html.contains("<tbody><tr><td style=\"text-align: center\">1</td></tr></tbody>"));
    }

    #[test]
    fn test_raw_text_content_strips_tags() {
        let node = Node::Raw("<b>bold</b> &amp; more".to_string());
        assert_eq!(node.text_content(), "bold & more");
    }

    #[test]
    fn test_ordered_list_start() {
        let dom = build("3. three\n4. four");
        assert!(inner(&dom).starts_with("<ol start=\"3\">"));
    }
}
