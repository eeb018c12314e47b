//! Light/dark theme value, palettes and persistence interface

use crate::error::Result;
use crate::markdown::{CodePalette, Rgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Key under which the preference is stored
pub const THEME_STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Interpret a stored preference; anything but `"dark"` is light
    pub fn from_stored(value: Option<&str>) -> Theme {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn palette(&self) -> ThemePalette {
        match self {
            Theme::Light => ThemePalette::LIGHT,
            Theme::Dark => ThemePalette::DARK,
        }
    }

    /// Code block palette matching the page theme
    pub fn code_palette(&self) -> CodePalette {
        match self {
            Theme::Light => CodePalette::light(),
            Theme::Dark => CodePalette::tomorrow(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{}', expected light or dark", other)),
        }
    }
}

/// Page chrome colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub background: Rgb,
    pub header: Rgb,
    pub border: Rgb,
    pub text: Rgb,
}

impl ThemePalette {
    pub const LIGHT: ThemePalette = ThemePalette {
        background: Rgb(0xff, 0xff, 0xff),
        header: Rgb(0xff, 0xff, 0xff),
        border: Rgb(0xf0, 0xf0, 0xf0),
        text: Rgb(0x00, 0x00, 0x00),
    };

    pub const DARK: ThemePalette = ThemePalette {
        background: Rgb(0x14, 0x14, 0x14),
        header: Rgb(0x1f, 0x1f, 0x1f),
        border: Rgb(0x30, 0x30, 0x30),
        text: Rgb(0xff, 0xff, 0xff),
    };
}

/// Persists the raw theme preference string
pub trait ThemeStore {
    /// Stored value, `None` if nothing was saved yet
    fn load_raw(&self) -> Result<Option<String>>;

    fn save_raw(&mut self, value: &str) -> Result<()>;

    /// Stored theme; unreadable or missing preferences mean light
    fn load_theme(&self) -> Theme {
        match self.load_raw() {
            Ok(value) => Theme::from_stored(value.as_deref()),
            Err(e) => {
                warn!("Failed to read theme preference: {}", e);
                Theme::default()
            }
        }
    }

    fn save_theme(&mut self, theme: Theme) -> Result<()> {
        self.save_raw(theme.as_str())
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    value: Option<String>,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load_raw(&self) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn save_raw(&mut self, value: &str) -> Result<()> {
        self.value = Some(value.to_string());
        Ok(())
    }
}

/// The active theme, passed explicitly to whatever renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeContext {
    theme: Theme,
}

impl ThemeContext {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Read the preference once at startup
    pub fn load(store: &dyn ThemeStore) -> Self {
        Self::new(store.load_theme())
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn palette(&self) -> ThemePalette {
        self.theme.palette()
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Flip the theme and return the new value
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        self.theme
    }

    /// Flip the theme and persist it
    pub fn toggle_and_save(&mut self, store: &mut dyn ThemeStore) -> Result<Theme> {
        let theme = self.toggle();
        store.save_theme(theme)?;
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KbError;
    use pretty_assertions::assert_eq;

    struct BrokenStore;

    impl ThemeStore for BrokenStore {
        fn load_raw(&self) -> Result<Option<String>> {
            Err(KbError::Storage("disk on fire".into()))
        }

        fn save_raw(&mut self, _value: &str) -> Result<()> {
            Err(KbError::Storage("disk on fire".into()))
        }
    }

    #[test]
    fn test_from_stored() {
        assert_eq!(Theme::from_stored(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_stored(Some("light")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("purple")), Theme::Light);
        assert_eq!(Theme::from_stored(None), Theme::Light);
    }

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Light.toggle().toggle(), Theme::Light);
    }

    #[test]
    fn test_palettes() {
        assert_eq!(Theme::Dark.palette().background.hex(), "#141414");
        assert_eq!(Theme::Dark.palette().header.hex(), "#1f1f1f");
        assert_eq!(Theme::Light.palette().border.hex(), "#f0f0f0");
        assert_eq!(Theme::Dark.code_palette().name, "tomorrow");
    }

    #[test]
    fn test_context_persists_toggle() {
        let mut store = MemoryThemeStore::new();
        let mut ctx = ThemeContext::load(&store);
        assert_eq!(ctx.theme(), Theme::Light);

        assert_eq!(ctx.toggle_and_save(&mut store).unwrap(), Theme::Dark);
        assert_eq!(store.load_raw().unwrap().as_deref(), Some("dark"));
        assert_eq!(ThemeContext::load(&store).theme(), Theme::Dark);
    }

    #[test]
    fn test_broken_store_defaults_to_light() {
        let store = BrokenStore;
        assert_eq!(store.load_theme(), Theme::Light);

        let mut store = BrokenStore;
        let mut ctx = ThemeContext::new(Theme::Light);
        assert!(ctx.toggle_and_save(&mut store).is_err());
        assert_eq!(ctx.theme(), Theme::Dark);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Dark".parse(), Ok(Theme::Dark));
        assert!("blue".parse::<Theme>().is_err());
    }
}
