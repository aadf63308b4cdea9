//! Template directory access

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PromptError;

const TEMPLATE_EXT: &str = "md";
const README: &str = "README.md";

/// A directory of `*.md` templates addressed by file stem
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sorted template names, README excluded
    pub fn list(&self) -> Result<Vec<String>, PromptError> {
        debug!(dir = ?self.dir, "TemplateStore::list: called");
        let entries = fs::read_dir(&self.dir).map_err(|source| PromptError::NotFound {
            path: self.dir.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().map(|e| e != TEMPLATE_EXT).unwrap_or(true) {
                continue;
            }
            if path.file_name().map(|n| n == README).unwrap_or(false) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Raw text of the named template
    pub fn read(&self, name: &str) -> Result<String, PromptError> {
        let path = self.path_of(name);
        debug!(?path, "TemplateStore::read: called");
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PromptError::TemplateNotFound { name: name.to_string() },
            _ => PromptError::Io(e),
        })
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, TEMPLATE_EXT))
    }
}
