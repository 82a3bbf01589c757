//! Change sets from a local tree-to-tree diff using git2.

use std::path::PathBuf;

use async_trait::async_trait;
use git2::{Delta, Diff, DiffFindOptions, Repository};
use tracing::debug;

use crate::error::{CollaboratorError, GitError};
use crate::matrix::{ChangeStatus, ChangedFile};
use crate::source::ChangeSetProvider;

use super::range::resolve_range;

/// Collect the files changed between `base` and `head` (default HEAD).
///
/// Diffs the merge base of the two refs against `head`, with rename detection.
pub fn changes_between(
    repo: &Repository,
    base: &str,
    head: Option<&str>,
) -> Result<Vec<ChangedFile>, GitError> {
    let range = resolve_range(repo, base, head)?;

    let from_tree = repo
        .find_commit(range.from)
        .and_then(|c| c.tree())
        .map_err(|e| GitError::Tree(range.from_ref.clone(), e))?;
    let to_tree = repo
        .find_commit(range.to)
        .and_then(|c| c.tree())
        .map_err(|e| GitError::Tree(range.to_ref.clone(), e))?;

    let mut diff = repo
        .diff_tree_to_tree(Some(&from_tree), Some(&to_tree), None)
        .map_err(GitError::DiffFailed)?;

    let mut find = DiffFindOptions::new();
    find.renames(true);
    diff.find_similar(Some(&mut find))
        .map_err(GitError::DiffFailed)?;

    let files = collect_files_from_diff(&diff);
    debug!(
        "{} files changed between {} and {}",
        files.len(),
        range.from_ref,
        range.to_ref
    );
    Ok(files)
}

/// Collect changed file entries from a diff.
fn collect_files_from_diff(diff: &Diff<'_>) -> Vec<ChangedFile> {
    let mut files = Vec::new();

    for delta in diff.deltas() {
        let status = match delta.status() {
            Delta::Added | Delta::Copied | Delta::Untracked => ChangeStatus::Added,
            Delta::Modified | Delta::Typechange => ChangeStatus::Modified,
            Delta::Deleted => ChangeStatus::Deleted,
            Delta::Renamed => ChangeStatus::Renamed,
            _ => ChangeStatus::Unknown,
        };

        let new_path = delta
            .new_file()
            .path()
            .map(|p| p.to_string_lossy().to_string());
        let old_path = delta
            .old_file()
            .path()
            .map(|p| p.to_string_lossy().to_string());

        let (path, previous_path) = match status {
            ChangeStatus::Renamed => (new_path.clone().or_else(|| old_path.clone()), old_path),
            ChangeStatus::Deleted => (old_path.or(new_path), None),
            _ => (new_path.or(old_path), None),
        };

        if let Some(path) = path.filter(|p| !p.is_empty()) {
            files.push(ChangedFile {
                path,
                status,
                previous_path,
            });
        }
    }

    files
}

/// Change-set provider backed by a local checkout.
#[derive(Debug, Clone)]
pub struct LocalDiff {
    pub workspace: PathBuf,
    pub base: String,
    pub head: Option<String>,
}

impl LocalDiff {
    pub fn new(workspace: impl Into<PathBuf>, base: impl Into<String>, head: Option<String>) -> Self {
        Self {
            workspace: workspace.into(),
            base: base.into(),
            head,
        }
    }
}

#[async_trait]
impl ChangeSetProvider for LocalDiff {
    async fn get_changes(&self) -> Result<Vec<ChangedFile>, CollaboratorError> {
        let repo = Repository::open(&self.workspace).map_err(GitError::OpenRepository)?;
        Ok(changes_between(&repo, &self.base, self.head.as_deref())?)
    }
}
