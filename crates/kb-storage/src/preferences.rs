//! File-backed preference store

use crate::paths::{atomic_write, default_data_dir};
use chrono::{DateTime, Utc};
use kb_core::error::{KbError, Result};
use kb_core::theme::ThemeStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PREFERENCES_FILE: &str = "preferences.toml";

/// Contents of the preferences file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Raw theme string as saved
    pub theme: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Preferences stored as TOML in the data directory
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Store backed by `<dir>/preferences.toml`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PREFERENCES_FILE),
        }
    }

    /// Store in the platform data directory
    pub fn default_location() -> Self {
        Self::new(default_data_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file; a missing file means defaults
    pub fn read(&self) -> Result<Preferences> {
        if !self.path.exists() {
            debug!("No preferences file at {:?}", self.path);
            return Ok(Preferences::default());
        }
        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            KbError::Storage(format!(
                "Corrupt preferences file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    pub fn write(&self, prefs: &Preferences) -> Result<()> {
        let content = toml::to_string_pretty(prefs)?;
        atomic_write(&self.path, &content)
    }
}

impl ThemeStore for PreferenceStore {
    fn load_raw(&self) -> Result<Option<String>> {
        Ok(self.read()?.theme)
    }

    fn save_raw(&mut self, value: &str) -> Result<()> {
        let mut prefs = self.read().unwrap_or_else(|e| {
            warn!("Replacing unreadable preferences: {}", e);
            Preferences::default()
        });
        prefs.theme = Some(value.to_string());
        prefs.updated_at = Some(Utc::now());
        self.write(&prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_core::theme::{Theme, ThemeContext};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_light() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path());
        assert_eq!(store.load_raw().unwrap(), None);
        assert_eq!(store.load_theme(), Theme::Light);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut store = PreferenceStore::new(dir.path());
        store.save_theme(Theme::Dark).unwrap();

        let reopened = PreferenceStore::new(dir.path());
        assert_eq!(reopened.load_theme(), Theme::Dark);
        let prefs = reopened.read().unwrap();
        assert_eq!(prefs.theme.as_deref(), Some("dark"));
        assert!(prefs.updated_at.is_some());
    }

    #[test]
    fn test_context_toggle_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = PreferenceStore::new(dir.path());
        let mut ctx = ThemeContext::load(&store);
        ctx.toggle_and_save(&mut store).unwrap();
        ctx.toggle_and_save(&mut store).unwrap();
        assert_eq!(PreferenceStore::new(dir.path()).load_theme(), Theme::Light);
    }

    #[test]
    fn test_unknown_value_reads_as_light() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PREFERENCES_FILE), "theme = \"sepia\"\n").unwrap();
        let store = PreferenceStore::new(dir.path());
        assert_eq!(store.load_raw().unwrap().as_deref(), Some("sepia"));
        assert_eq!(store.load_theme(), Theme::Light);
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PREFERENCES_FILE), "theme = [").unwrap();
        let mut store = PreferenceStore::new(dir.path());
        assert!(store.load_raw().is_err());
        assert_eq!(store.load_theme(), Theme::Light);

        store.save_theme(Theme::Dark).unwrap();
        assert_eq!(store.load_theme(), Theme::Dark);
    }
}
