//! Changed files of a `base...head` comparison via octocrab.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CollaboratorError, ConfigError, GitHubError};
use crate::matrix::{ChangeStatus, ChangedFile};
use crate::source::ChangeSetProvider;

use super::retry::retry_with_backoff;

/// GitHub's default (and maximum) page size for the compare endpoint.
pub const DEFAULT_PER_PAGE: u8 = 100;

/// Upper bound on pages fetched for a single comparison.
const MAX_PAGES: u32 = 50;

#[derive(Debug, Deserialize)]
struct CompareResponse {
    #[serde(default)]
    total_commits: u64,
    #[serde(default)]
    files: Vec<CompareFile>,
}

#[derive(Debug, Deserialize)]
struct CompareFile {
    filename: String,
    status: String,
    #[serde(default)]
    previous_filename: Option<String>,
}

impl From<CompareFile> for ChangedFile {
    fn from(file: CompareFile) -> Self {
        let status = ChangeStatus::from_host(&file.status);
        ChangedFile {
            path: file.filename,
            status,
            previous_path: file.previous_filename.filter(|_| status == ChangeStatus::Renamed),
        }
    }
}

#[derive(Debug, Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

/// Change-set provider backed by the GitHub compare API.
#[derive(Clone)]
pub struct GitHubCompare {
    client: Octocrab,
    owner: String,
    repo: String,
    base: String,
    head: String,
    per_page: u8,
}

impl GitHubCompare {
    /// Build a client for `api_url` authenticated with `token`.
    pub fn new(
        api_url: &str,
        token: &str,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Self, ConfigError> {
        let invalid = |e: octocrab::Error| ConfigError::InvalidApiUrl {
            url: api_url.to_string(),
            reason: e.to_string(),
        };
        let client = Octocrab::builder()
            .base_uri(api_url)
            .map_err(invalid)?
            .personal_token(token.to_string())
            .build()
            .map_err(invalid)?;

        Ok(Self::with_client(client, owner, repo, base, head))
    }

    /// Use a pre-configured octocrab client.
    ///
    /// This allows dependency injection for testing with mock servers.
    pub fn with_client(client: Octocrab, owner: &str, repo: &str, base: &str, head: &str) -> Self {
        Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
            base: base.to_string(),
            head: head.to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page.clamp(1, DEFAULT_PER_PAGE);
        self
    }

    fn route(&self) -> String {
        format!(
            "/repos/{}/{}/compare/{}...{}",
            self.owner,
            self.repo,
            encode_ref(&self.base),
            encode_ref(&self.head)
        )
    }

    async fn fetch_page(&self, page: u32) -> Result<CompareResponse, GitHubError> {
        let route = self.route();
        let params = PageParams {
            per_page: self.per_page,
            page,
        };

        retry_with_backoff(
            || async {
                info!("GitHub API request: {} (page {})", route, page);
                self.client
                    .get::<CompareResponse, _, _>(&route, Some(&params))
                    .await
                    .map_err(|e| self.classify(e))
            },
            GitHubError::is_transient,
            |e| GitHubError::RetriesExhausted(Box::new(e)),
        )
        .await
    }

    /// Map an octocrab error onto the cases callers act on differently.
    fn classify(&self, e: octocrab::Error) -> GitHubError {
        // octocrab only surfaces GitHub's message text, in Display for some
        // variants and Debug for others.
        let err_lower = e.to_string().to_lowercase();
        let debug_lower = format!("{:?}", e).to_lowercase();
        let contains = |needle: &str| err_lower.contains(needle) || debug_lower.contains(needle);

        if contains("rate limit") {
            return GitHubError::RateLimited {
                reset_time: "unknown".to_string(),
            };
        }
        if contains("bad credentials") || contains("requires authentication") {
            return GitHubError::Unauthorized;
        }
        if contains("not found") || contains("no common ancestor") {
            return GitHubError::NotFound {
                owner: self.owner.clone(),
                repo: self.repo.clone(),
                base: self.base.clone(),
                head: self.head.clone(),
            };
        }
        GitHubError::FetchComparison {
            base: self.base.clone(),
            head: self.head.clone(),
            source: Box::new(e),
        }
    }

    /// Fetch every page of the comparison and collect its files in API order.
    pub async fn fetch_changed_files(&self) -> Result<Vec<ChangedFile>, GitHubError> {
        let mut files = Vec::new();
        let mut page = 1u32;

        loop {
            let response = self.fetch_page(page).await?;
            let page_len = response.files.len();
            files.extend(response.files.into_iter().map(ChangedFile::from));

            let commits_seen = u64::from(page) * u64::from(self.per_page);
            if page_len == 0 || commits_seen >= response.total_commits {
                break;
            }

            page += 1;

            if page > MAX_PAGES {
                warn!(
                    "Reached {}-page safety limit while comparing {}...{} for {}/{}",
                    MAX_PAGES, self.base, self.head, self.owner, self.repo
                );
                break;
            }
        }

        Ok(files)
    }
}

/// Percent-encode each `/`-separated segment of a ref so it stays one route component.
fn encode_ref(reference: &str) -> String {
    reference
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl ChangeSetProvider for GitHubCompare {
    async fn get_changes(&self) -> Result<Vec<ChangedFile>, CollaboratorError> {
        Ok(self.fetch_changed_files().await?)
    }
}
