//! Syntax highlighting using syntect
//!
//! Code is parsed with syntect's bundled grammars and every region is
//! classified into a small set of token kinds (comment, string, keyword, ...).
//! Colours come from a fixed [`CodePalette`], not from a syntect theme, so the
//! same token kinds render identically in HTML and in the terminal.

use serde::{Deserialize, Serialize};
use syntect::easy::ScopeRegionIterator;
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::debug;

/// Classification of a highlighted region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Plain,
    Comment,
    Punctuation,
    Property,
    Selector,
    AttrName,
    String,
    ClassName,
    Function,
    Keyword,
    Boolean,
    Number,
    Constant,
    Symbol,
    Deleted,
    Regex,
    Important,
    Tag,
    Operator,
}

impl TokenKind {
    /// CSS class name used in rendered markup (`token <class>`)
    pub fn class_name(&self) -> &'static str {
        match self {
            TokenKind::Plain => "plain",
            TokenKind::Comment => "comment",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Property => "property",
            TokenKind::Selector => "selector",
            TokenKind::AttrName => "attr-name",
            TokenKind::String => "string",
            TokenKind::ClassName => "class-name",
            TokenKind::Function => "function",
            TokenKind::Keyword => "keyword",
            TokenKind::Boolean => "boolean",
            TokenKind::Number => "number",
            TokenKind::Constant => "constant",
            TokenKind::Symbol => "symbol",
            TokenKind::Deleted => "deleted",
            TokenKind::Regex => "regex",
            TokenKind::Important => "important",
            TokenKind::Tag => "tag",
            TokenKind::Operator => "operator",
        }
    }
}

/// A run of text with one classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// Tokens of one source line, line ending excluded
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighlightedLine {
    pub tokens: Vec<Token>,
}

impl HighlightedLine {
    /// Text of the line
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn push(&mut self, kind: TokenKind, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.tokens.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(text),
            _ => self.tokens.push(Token {
                kind,
                text: text.to_string(),
            }),
        }
    }
}

/// Highlighted code block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightedCode {
    /// Name of the grammar that was used, `None` when the language is unknown
    pub syntax: Option<String>,
    pub lines: Vec<HighlightedLine>,
}

impl HighlightedCode {
    /// Reassemble the source text, lines joined by `\n`
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(HighlightedLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn plain(code: &str) -> Self {
        let lines = code
            .split('\n')
            .map(|line| {
                let mut hl = HighlightedLine::default();
                hl.push(TokenKind::Plain, line);
                hl
            })
            .collect();
        Self {
            syntax: None,
            lines,
        }
    }
}

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Visual style of one token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenStyle {
    pub color: Rgb,
    pub bold: bool,
    pub italic: bool,
}

impl TokenStyle {
    const fn color(color: Rgb) -> Self {
        Self {
            color,
            bold: false,
            italic: false,
        }
    }

    const fn bold(color: Rgb) -> Self {
        Self {
            color,
            bold: true,
            italic: false,
        }
    }

    const fn italic(color: Rgb) -> Self {
        Self {
            color,
            bold: false,
            italic: true,
        }
    }

    /// Inline CSS for this style
    pub fn css(&self) -> String {
        let mut css = format!("color: {}", self.color.hex());
        if self.bold {
            css.push_str("; font-weight: bold");
        }
        if self.italic {
            css.push_str("; font-style: italic");
        }
        css
    }
}

/// Fixed colour palette for code blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePalette {
    pub name: &'static str,
    pub background: Rgb,
    pub foreground: Rgb,
    pub border: Rgb,
}

impl CodePalette {
    /// Light palette used by the document viewer
    pub fn light() -> Self {
        Self {
            name: "light",
            background: Rgb(0xff, 0xff, 0xff),
            foreground: Rgb(0x33, 0x33, 0x33),
            border: Rgb(0xe8, 0xe8, 0xe8),
        }
    }

    /// Dark "tomorrow" palette
    pub fn tomorrow() -> Self {
        Self {
            name: "tomorrow",
            background: Rgb(0x2d, 0x2d, 0x2d),
            foreground: Rgb(0xcc, 0xcc, 0xcc),
            border: Rgb(0x3a, 0x3a, 0x3a),
        }
    }

    /// Style for a token kind
    pub fn style(&self, kind: TokenKind) -> TokenStyle {
        if self.name == "tomorrow" {
            tomorrow_style(kind, self.foreground)
        } else {
            light_style(kind, self.foreground)
        }
    }
}

impl Default for CodePalette {
    fn default() -> Self {
        Self::light()
    }
}

fn light_style(kind: TokenKind, fg: Rgb) -> TokenStyle {
    const GRAY: Rgb = Rgb(0x99, 0x99, 0x99);
    const MAROON: Rgb = Rgb(0x99, 0x00, 0x55);
    const GREEN: Rgb = Rgb(0x66, 0x99, 0x00);
    const BLUE: Rgb = Rgb(0x00, 0x77, 0xaa);
    const PINK: Rgb = Rgb(0xdd, 0x4a, 0x68);
    const BROWN: Rgb = Rgb(0x9a, 0x6e, 0x3a);

    match kind {
        TokenKind::Plain => TokenStyle::color(fg),
        TokenKind::Comment => TokenStyle::italic(GRAY),
        TokenKind::Punctuation => TokenStyle::color(GRAY),
        TokenKind::Property
        | TokenKind::Boolean
        | TokenKind::Number
        | TokenKind::Constant
        | TokenKind::Symbol
        | TokenKind::Deleted
        | TokenKind::Tag => TokenStyle::color(MAROON),
        TokenKind::Selector | TokenKind::AttrName => TokenStyle::color(GREEN),
        TokenKind::String => TokenStyle::color(BLUE),
        TokenKind::ClassName | TokenKind::Function => TokenStyle::color(PINK),
        TokenKind::Keyword => TokenStyle::bold(BLUE),
        TokenKind::Regex | TokenKind::Operator => TokenStyle::color(BROWN),
        TokenKind::Important => TokenStyle::bold(Rgb(0xee, 0x99, 0x00)),
    }
}

fn tomorrow_style(kind: TokenKind, fg: Rgb) -> TokenStyle {
    match kind {
        TokenKind::Plain | TokenKind::Punctuation => TokenStyle::color(fg),
        TokenKind::Comment => TokenStyle::italic(Rgb(0x99, 0x99, 0x99)),
        TokenKind::Tag | TokenKind::AttrName | TokenKind::Deleted => {
            TokenStyle::color(Rgb(0xe2, 0x77, 0x7a))
        }
        TokenKind::Boolean | TokenKind::Number | TokenKind::Function => {
            TokenStyle::color(Rgb(0xf0, 0x8d, 0x49))
        }
        TokenKind::Property | TokenKind::ClassName | TokenKind::Constant | TokenKind::Symbol => {
            TokenStyle::color(Rgb(0xf8, 0xc5, 0x55))
        }
        TokenKind::Selector | TokenKind::Keyword => TokenStyle::color(Rgb(0xcc, 0x99, 0xcd)),
        TokenKind::Important => TokenStyle::bold(Rgb(0xcc, 0x99, 0xcd)),
        TokenKind::String | TokenKind::Regex => TokenStyle::color(Rgb(0x7e, 0xc6, 0x99)),
        TokenKind::Operator => TokenStyle::color(Rgb(0x67, 0xcd, 0xcc)),
    }
}

/// Short language tags that the bundled grammars do not know by name
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("ts", "js"),
    ("typescript", "js"),
    ("tsx", "js"),
    ("jsx", "js"),
    ("javascript", "js"),
    ("vue", "html"),
    ("shell", "sh"),
    ("zsh", "sh"),
    ("console", "sh"),
    ("yml", "yaml"),
    ("golang", "go"),
];

/// Syntax highlighter for fenced code
pub struct Highlighter {
    syntax_set: SyntaxSet,
}

impl Highlighter {
    /// Create a highlighter with the bundled grammars
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Look up a grammar for a fence language tag
    pub fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        let lang = language.trim().to_ascii_lowercase();
        let token = LANGUAGE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lang)
            .map(|(_, target)| *target)
            .unwrap_or(lang.as_str());

        self.syntax_set.find_syntax_by_token(token)
    }

    /// Whether a language tag resolves to a grammar
    pub fn supports(&self, language: &str) -> bool {
        self.find_syntax(language).is_some()
    }

    /// Highlight a code block
    ///
    /// Unknown languages yield one plain token per line. The token text of
    /// each line joined by `\n` always equals `code`.
    pub fn highlight(&self, code: &str, language: &str) -> HighlightedCode {
        let Some(syntax) = self.find_syntax(language) else {
            debug!("No grammar for language '{}', using plain text", language);
            return HighlightedCode::plain(code);
        };

        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(code) {
            let content_len = line_content_len(line);
            let mut out = HighlightedLine::default();

            match state.parse_line(line, &self.syntax_set) {
                Ok(ops) => {
                    let mut offset = 0;
                    for (region, op) in ScopeRegionIterator::new(&ops, line) {
                        if stack.apply(op).is_err() {
                            debug!("Scope stack rejected an operation, resetting");
                            stack = ScopeStack::new();
                        }
                        let start = offset.min(content_len);
                        offset += region.len();
                        let end = offset.min(content_len);
                        if start < end {
                            out.push(classify(&stack), &line[start..end]);
                        }
                    }
                }
                Err(e) => {
                    debug!("Failed to parse line as {}: {}", syntax.name, e);
                    out.push(TokenKind::Plain, &line[..content_len]);
                }
            }

            lines.push(out);
        }

        // LinesWithEndings yields nothing for "" and drops a final empty line
        if code.is_empty() || code.ends_with('\n') {
            lines.push(HighlightedLine::default());
        }

        HighlightedCode {
            syntax: Some(syntax.name.clone()),
            lines,
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

fn line_content_len(line: &str) -> usize {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        stripped.len()
    } else if let Some(stripped) = line.strip_suffix('\n') {
        stripped.len()
    } else {
        line.len()
    }
}

/// Classify the region under the current scope stack
///
/// Comments and strings win over anything nested in them (quote characters
/// are part of the string); otherwise the innermost recognised scope decides.
fn classify(stack: &ScopeStack) -> TokenKind {
    let names: Vec<String> = stack.as_slice().iter().map(|s| s.build_string()).collect();

    for name in &names {
        if name.starts_with("comment") {
            return TokenKind::Comment;
        }
        if name.starts_with("string.regexp") {
            return TokenKind::Regex;
        }
        if name.starts_with("string") {
            return TokenKind::String;
        }
    }

    names
        .iter()
        .rev()
        .find_map(|name| kind_for_scope(name))
        .unwrap_or(TokenKind::Plain)
}

fn kind_for_scope(name: &str) -> Option<TokenKind> {
    let kind = if name.contains("important") {
        TokenKind::Important
    } else if name.starts_with("constant.numeric") {
        TokenKind::Number
    } else if name.starts_with("constant.language.boolean") {
        TokenKind::Boolean
    } else if name.starts_with("constant.character") || name.starts_with("constant.other.symbol") {
        TokenKind::Symbol
    } else if name.starts_with("constant") {
        TokenKind::Constant
    } else if name.starts_with("keyword.operator") {
        TokenKind::Operator
    } else if name.starts_with("keyword") || name.starts_with("storage") {
        TokenKind::Keyword
    } else if name.starts_with("support.type.property-name")
        || name.starts_with("variable.other.property")
        || name.starts_with("meta.property-name")
    {
        TokenKind::Property
    } else if name.starts_with("entity.name.function")
        || name.starts_with("support.function")
        || name.starts_with("variable.function")
    {
        TokenKind::Function
    } else if name.starts_with("entity.name.class")
        || name.starts_with("entity.name.type")
        || name.starts_with("entity.other.inherited-class")
        || name.starts_with("support.class")
    {
        TokenKind::ClassName
    } else if name.starts_with("entity.other.attribute-name") {
        TokenKind::AttrName
    } else if name.starts_with("entity.name.tag") {
        TokenKind::Tag
    } else if name.starts_with("meta.selector") {
        TokenKind::Selector
    } else if name.starts_with("markup.deleted") {
        TokenKind::Deleted
    } else if name.starts_with("punctuation") {
        TokenKind::Punctuation
    } else {
        return None;
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_highlighter_knows_common_languages() {
        let h = Highlighter::new();
        assert!(h.supports("js"));
        assert!(h.supports("rust"));
        assert!(h.supports("ts"));
        assert!(!h.supports("no-such-language"));
    }

    #[test]
    fn test_highlight_preserves_text() {
        let h = Highlighter::new();
        let code = "const x = 1; // one\nlet s = \"two\";";
        let out = h.highlight(code, "js");
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.text(), code);
    }

    #[test]
    fn test_highlight_classifies_tokens() {
        let h = Highlighter::new();
        let out = h.highlight("// note\nconst s = \"hi\";", "js");
        let kinds: Vec<TokenKind> = out
            .lines
            .iter()
            .flat_map(|l| l.tokens.iter().map(|t| t.kind))
            .collect();
        assert!(kinds.contains(&TokenKind::Comment));
        assert!(kinds.contains(&TokenKind::Keyword));
        assert!(kinds.contains(&TokenKind::String));
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let h = Highlighter::new();
        let out = h.highlight("a\nb", "xyz");
        assert!(out.syntax.is_none());
        assert_eq!(out.lines.len(), 2);
        assert!(out
            .lines
            .iter()
            .all(|l| l.tokens.iter().all(|t| t.kind == TokenKind::Plain)));
    }

    #[test]
    fn test_trailing_newline_keeps_empty_line() {
        let h = Highlighter::new();
        let out = h.highlight("x\n", "rust");
        assert_eq!(out.text(), "x\n");
    }

    #[test]
    fn test_palettes() {
        let light = CodePalette::light();
        assert_eq!(light.style(TokenKind::Keyword).color.hex(), "#0077aa");
        assert!(light.style(TokenKind::Keyword).bold);
        assert!(light.style(TokenKind::Comment).italic);

        let dark = CodePalette::tomorrow();
        assert_eq!(dark.background.hex(), "#2d2d2d");
        assert_eq!(dark.style(TokenKind::String).color.hex(), "#7ec699");
    }

    #[test]
    fn test_token_style_css() {
        let style = CodePalette::light().style(TokenKind::Comment);
        assert_eq!(style.css(), "color: #999999; font-style: italic");
    }
}
