use std::path::{Path, PathBuf};

use localforge_core::{Document, Value};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::RetrievalResult;
use crate::RetrievalError;

pub const DEFAULT_EXTENSIONS: [&str; 5] = [".py", ".js", ".ts", ".md", ".txt"];

/// Recursively loads files whose extension is in the allow-list.
///
/// Each file becomes one document keyed by its path, with `path` and
/// `extension` metadata. Files are decoded as UTF-8, replacing invalid bytes.
#[derive(Clone, Debug)]
pub struct DirectoryLoader {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    /// Replaces the allow-list. Entries may be given with or without the dot.
    pub fn extensions<I, T>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load(&self) -> RetrievalResult<Vec<Document>> {
        if !self.root.exists() {
            return Err(RetrievalError::PathNotFound(self.root.clone()));
        }

        let mut docs = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(extension) = self.matching_extension(path) else {
                continue;
            };
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable file");
                    continue;
                }
            };

            let path_str = path.to_string_lossy().to_string();
            docs.push(
                Document::new(path_str.clone(), String::from_utf8_lossy(&bytes))
                    .with_metadata("path", Value::String(path_str))
                    .with_metadata("extension", Value::String(extension)),
            );
        }

        debug!(root = %self.root.display(), files = docs.len(), "loaded directory");
        Ok(docs)
    }

    fn matching_extension(&self, path: &Path) -> Option<String> {
        let extension = path.extension()?.to_str()?;
        let extension = normalize_extension(extension);
        self.extensions
            .iter()
            .any(|allowed| *allowed == extension)
            .then_some(extension)
    }
}

fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim().trim_start_matches('.').to_lowercase();
    format!(".{trimmed}")
}
