//! Error types for neo modules using thiserror.

use thiserror::Error;

/// Errors in user-provided configuration. Never worth retrying.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    #[error("'{0}' is a reserved name for the job matrix and cannot be used as a group name")]
    ReservedGroupName(String),

    #[error("Invalid default pattern '{glob}': {source}")]
    InvalidGlob {
        glob: String,
        #[source]
        source: globset::Error,
    },

    #[error("Missing {0}. Pass it explicitly or run inside a GitHub Actions pull_request or push event")]
    MissingRef(&'static str),

    #[error("Unsupported GitHub event '{0}'. Supported events: pull_request, pull_request_target, push")]
    UnsupportedEvent(String),

    #[error("Failed to read GitHub event payload {path}: {reason}")]
    EventPayload { path: String, reason: String },

    #[error("Invalid repository '{0}', expected owner/name")]
    InvalidRepository(String),

    #[error("Missing repository. Pass --github-repository owner/name or set GITHUB_REPOSITORY")]
    MissingRepository,

    #[error("Invalid GitHub API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error(
        "GitHub authentication failed: no valid auth found. Run 'gh auth login' or set GITHUB_TOKEN environment variable"
    )]
    MissingToken,
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Failed to fetch comparison {base}...{head}: {source}")]
    FetchComparison {
        base: String,
        head: String,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("GitHub rejected the credentials (bad or expired token)")]
    Unauthorized,

    #[error("Rate limited by GitHub API. Resets at: {reset_time}")]
    RateLimited { reset_time: String },

    #[error("Repository or refs not found: {owner}/{repo} ({base}...{head})")]
    NotFound {
        owner: String,
        repo: String,
        base: String,
        head: String,
    },

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<GitHubError>),
}

impl GitHubError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, GitHubError::Unauthorized | GitHubError::NotFound { .. })
    }
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to find reference '{0}': {1}")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to read tree for '{0}': {1}")]
    Tree(String, #[source] git2::Error),

    #[error("Failed to diff trees: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to read index: {0}")]
    Index(#[source] git2::Error),
}

/// Errors from the filesystem walk.
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Failed to walk {root}: {source}")]
    Walk {
        root: String,
        #[source]
        source: ignore::Error,
    },
}

/// Errors from the collaborators that feed the matrix (change sets and listings).
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Walk(#[from] WalkError),
}

impl CollaboratorError {
    pub fn is_retryable(&self) -> bool {
        match self {
            CollaboratorError::GitHub(e) => match e {
                GitHubError::RetriesExhausted(inner) => inner.is_transient(),
                other => other.is_transient(),
            },
            CollaboratorError::Git(_) | CollaboratorError::Walk(_) => false,
        }
    }
}

/// Top-level error for matrix generation.
#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to retrieve changed files: {0}")]
    Changes(#[source] CollaboratorError),

    #[error("Failed to list repository files: {0}")]
    Listing(#[source] CollaboratorError),
}

impl MatrixError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, MatrixError::Config(_))
    }

    /// Whether re-running the invocation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            MatrixError::Config(_) => false,
            MatrixError::Changes(e) | MatrixError::Listing(e) => e.is_retryable(),
        }
    }
}
