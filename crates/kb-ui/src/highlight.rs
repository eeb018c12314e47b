//! Highlighted code to ratatui spans

use crate::theme::color;
use kb_core::markdown::{CodePalette, HighlightedLine, TokenKind, TokenStyle};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// Terminal style for one token kind
pub fn token_style(palette: &CodePalette, kind: TokenKind) -> Style {
    to_ratatui_style(palette.style(kind), palette)
}

fn to_ratatui_style(style: TokenStyle, palette: &CodePalette) -> Style {
    let mut out = Style::default()
        .fg(color(style.color))
        .bg(color(palette.background));
    if style.bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.italic {
        out = out.add_modifier(Modifier::ITALIC);
    }
    out
}

/// Spans of one highlighted line
pub fn line_spans(line: &HighlightedLine, palette: &CodePalette) -> Vec<Span<'static>> {
    line.tokens
        .iter()
        .map(|token| Span::styled(token.text.clone(), token_style(palette, token.kind)))
        .collect()
}

/// A code line without highlighting, in the palette's foreground
pub fn plain_line(text: &str, palette: &CodePalette) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(color(palette.foreground))
            .bg(color(palette.background)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_core::markdown::Highlighter;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spans_keep_text() {
        let code = Highlighter::new().highlight("const x = 1;", "js");
        let palette = CodePalette::light();
        let spans = line_spans(&code.lines[0], &palette);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "const x = 1;");
    }

    #[test]
    fn test_keyword_style_differs_from_plain() {
        let palette = CodePalette::tomorrow();
        assert_ne!(
            token_style(&palette, TokenKind::Keyword),
            token_style(&palette, TokenKind::Plain)
        );
    }
}
