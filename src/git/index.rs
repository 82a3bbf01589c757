//! Tracked-file listing from the git index.

use std::path::PathBuf;

use git2::Repository;

use crate::error::{CollaboratorError, GitError};
use crate::source::RepositoryLister;

/// List every path tracked in the index of `repo`, in index (sorted) order.
pub fn tracked_files(repo: &Repository) -> Result<Vec<String>, GitError> {
    let index = repo.index().map_err(GitError::Index)?;
    Ok(index
        .iter()
        .map(|entry| String::from_utf8_lossy(&entry.path).into_owned())
        .collect())
}

/// Repository lister over the tracked files of a checkout.
#[derive(Debug, Clone)]
pub struct IndexLister {
    pub workspace: PathBuf,
}

impl IndexLister {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }
}

impl RepositoryLister for IndexLister {
    fn list_all_files(&self) -> Result<Vec<String>, CollaboratorError> {
        let repo = Repository::open(&self.workspace).map_err(GitError::OpenRepository)?;
        Ok(tracked_files(&repo)?)
    }
}
