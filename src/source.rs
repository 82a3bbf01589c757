//! Collaborators that feed the matrix: where changes and repository files come from.

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::matrix::ChangedFile;

/// Produces the change set for one invocation.
///
/// This abstraction allows mocking the GitHub API and git in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChangeSetProvider: Send + Sync {
    async fn get_changes(&self) -> Result<Vec<ChangedFile>, CollaboratorError>;
}

/// Lists every file of the current checkout, relative to its root, with `/` separators.
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryLister: Send + Sync {
    fn list_all_files(&self) -> Result<Vec<String>, CollaboratorError>;
}

/// A change set that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticChanges(pub Vec<ChangedFile>);

#[async_trait]
impl ChangeSetProvider for StaticChanges {
    async fn get_changes(&self) -> Result<Vec<ChangedFile>, CollaboratorError> {
        Ok(self.0.clone())
    }
}

/// A repository listing that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticListing(pub Vec<String>);

impl RepositoryLister for StaticListing {
    fn list_all_files(&self) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.0.clone())
    }
}
