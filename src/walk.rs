//! Repository listing by walking the checkout on disk.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::{CollaboratorError, WalkError};
use crate::source::RepositoryLister;

/// Lists every file under `root`, honoring `.gitignore` and skipping `.git`.
#[derive(Debug, Clone)]
pub struct DirectoryLister {
    root: PathBuf,
}

impl DirectoryLister {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn walk(&self) -> Result<Vec<String>, WalkError> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .require_git(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| WalkError::Walk {
                root: self.root.display().to_string(),
                source: e,
            })?;

            if entry.file_type().is_some_and(|t| t.is_file()) {
                files.push(relative_path(&self.root, entry.path()));
            }
        }

        Ok(files)
    }
}

/// `path` relative to `root`, joined with `/` regardless of platform.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl RepositoryLister for DirectoryLister {
    fn list_all_files(&self) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.walk()?)
    }
}
