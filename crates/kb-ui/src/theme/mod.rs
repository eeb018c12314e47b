//! Terminal colours for the page themes

use kb_core::markdown::Rgb;
use kb_core::theme::Theme;
use ratatui::prelude::*;

/// Convert a core colour to a terminal colour
pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Application theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiTheme {
    /// Page background
    pub background: Color,
    /// Title bar background
    pub header: Color,
    /// Border color for unfocused panels
    pub border: Color,
    /// Body text
    pub text: Color,
    /// Border color for the focused panel
    pub focus_border: Color,
    /// Headings and selection
    pub accent: Color,
    /// Secondary text such as group titles and hints
    pub muted: Color,
    /// Inline code
    pub code: Color,
    /// Link text
    pub link: Color,
}

impl UiTheme {
    pub fn new(theme: Theme) -> Self {
        let palette = theme.palette();
        let (accent, muted, code, link) = if theme.is_dark() {
            (Color::Cyan, Color::Gray, Color::Yellow, Color::LightBlue)
        } else {
            (Color::Blue, Color::DarkGray, Color::Magenta, Color::Blue)
        };
        Self {
            background: color(palette.background),
            header: color(palette.header),
            border: color(palette.border),
            text: color(palette.text),
            focus_border: accent,
            accent,
            muted,
            code,
            link,
        }
    }

    /// Base style for page content
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Style of the selected list row
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for UiTheme {
    fn default() -> Self {
        Self::new(Theme::Light)
    }
}

impl From<Theme> for UiTheme {
    fn from(theme: Theme) -> Self {
        Self::new(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_light_and_dark_backgrounds() {
        assert_eq!(UiTheme::new(Theme::Light).background, Color::Rgb(0xff, 0xff, 0xff));
        assert_eq!(UiTheme::new(Theme::Dark).background, Color::Rgb(0x14, 0x14, 0x14));
        assert_eq!(UiTheme::default(), UiTheme::from(Theme::Light));
    }
}
