//! Documents read from a directory tree

use kb_core::document::DocumentSource;
use kb_core::error::DocumentLoadError;
use kb_core::types::MarkdownDocument;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Resolves catalog paths such as `/src/docs/css/grid.md` under a root directory
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of a catalog path; rejects anything leaving the root
    pub fn resolve(&self, path: &str) -> Result<PathBuf, DocumentLoadError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if path.trim().is_empty() || relative.as_os_str().is_empty() {
            return Err(DocumentLoadError::InvalidPath(path.to_string()));
        }

        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(DocumentLoadError::InvalidPath(path.to_string()));
                }
            }
        }
        Ok(resolved)
    }
}

impl DocumentSource for FsDocumentSource {
    fn fetch(&self, path: &str) -> Result<MarkdownDocument, DocumentLoadError> {
        let file = self.resolve(path)?;
        debug!("Reading document {} from {:?}", path, file);

        let bytes = fs::read(&file).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DocumentLoadError::NotFound(path.to_string()),
            _ => DocumentLoadError::Read {
                path: path.to_string(),
                message: e.to_string(),
            },
        })?;

        let text =
            String::from_utf8(bytes).map_err(|_| DocumentLoadError::NotText(path.to_string()))?;
        Ok(MarkdownDocument::new(text))
    }
}
