//! Configuration file location and persistence

use crate::paths::{atomic_write, default_config_dir};
use kb_core::config::Config;
use kb_core::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE: &str = "config.toml";

/// Reads and writes `config.toml`
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store for an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `config.toml` in the platform config directory
    pub fn default_location() -> Self {
        Self::new(default_config_dir().join(CONFIG_FILE))
    }

    /// Explicit file if given, the default location otherwise
    pub fn resolve(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::new(p),
            None => Self::default_location(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the file, or defaults if it does not exist
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!("No config at {:?}, using defaults", self.path);
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Config::from_toml_str(&content)
            .map_err(|e| e.with_context(format!("Invalid config {}", self.path.display())))
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        atomic_write(&self.path, &config.to_toml_string()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_core::export::PlainTextPolicy;
    use kb_core::theme::Theme;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.toml"));
        assert!(!store.exists());
        assert_eq!(store.load().unwrap(), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("sub/config.toml"));

        let mut config = Config::default();
        config.render.plain_text_policy = PlainTextPolicy::FlattenRendered;
        config.ui.theme = Theme::Dark;
        config.clipboard.command = Some("wl-copy".to_string());
        store.save(&config).unwrap();

        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[render\n").unwrap();
        let err = ConfigStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }
}
