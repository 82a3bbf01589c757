//! neo - A CLI tool that turns changed files into a CI job matrix.
//!
//! # Overview
//!
//! neo matches a regular expression with named groups against the files
//! changed in a pull request or push, groups the matches by their captured
//! values, and emits one matrix entry per distinct group tuple with a reason
//! summarizing how its files changed. Changes to shared paths (default
//! patterns), or a change set with no matches when `defaults` is set, expand
//! the matrix to every matching file in the repository.

pub mod error;
pub mod git;
pub mod github;
pub mod matrix;
pub mod output;
pub mod source;
pub mod walk;

// Re-export commonly used types
pub use error::{CollaboratorError, ConfigError, GitError, GitHubError, MatrixError, WalkError};
pub use matrix::{
    ChangeStatus, ChangedFile, DefaultPatterns, InputMode, Matrix, MatrixConfig, MatrixEntry,
    MatrixPattern, Reason, RenamePolicy, UngroupedPolicy,
};
pub use source::{ChangeSetProvider, RepositoryLister};
