//! GitHub API operations using octocrab.

pub mod auth;
pub mod compare;
pub mod event;
pub mod retry;

pub use auth::get_github_token;
pub use compare::GitHubCompare;
pub use event::{CompareRefs, parse_repository, resolve_refs};
