//! Platform directories and atomic file writes

use kb_core::error::{KbError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "kbase", "kbase")
}

fn home_fallback() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kbase")
}

/// Directory for user data such as preferences (~/.kbase when no platform dir exists)
pub fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(home_fallback)
}

/// Directory holding `config.toml`
pub fn default_config_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(home_fallback)
}

/// Write `content` to a temp file next to `path`, then rename over it
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                KbError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create directory {}: {}", parent.display(), e),
                ))
            })?;
            debug!("Created directory: {:?}", parent);
        }
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| KbError::Storage(format!("Invalid file path: {}", path.display())))?;
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    {
        let mut file = fs::File::create(&temp_path).map_err(|e| {
            KbError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        KbError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to rename temp file: {}", e),
        ))
    })?;

    debug!("Wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("file.toml");

        atomic_write(&path, "a = 1\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a = 1\n");
        assert!(!dir.path().join("nested").join(".file.toml.tmp").exists());

        atomic_write(&path, "a = 2\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a = 2\n");
    }
}
