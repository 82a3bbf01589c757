//! Comparison refs from the GitHub Actions event payload.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// The `base...head` pair to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRefs {
    pub base: String,
    pub head: String,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    base: CommitRef,
    head: CommitRef,
}

#[derive(Debug, Deserialize)]
struct PullRequestEvent {
    pull_request: PullRequest,
}

#[derive(Debug, Deserialize)]
struct PushEvent {
    before: String,
    after: String,
}

/// Extract the comparison refs from an event payload.
pub fn refs_from_event(event_name: &str, payload: &str) -> Result<CompareRefs, ConfigError> {
    let invalid = |e: serde_json::Error| ConfigError::EventPayload {
        path: event_name.to_string(),
        reason: e.to_string(),
    };

    match event_name {
        "pull_request" | "pull_request_target" => {
            let event: PullRequestEvent = serde_json::from_str(payload).map_err(invalid)?;
            Ok(CompareRefs {
                base: event.pull_request.base.sha,
                head: event.pull_request.head.sha,
            })
        }
        "push" => {
            let event: PushEvent = serde_json::from_str(payload).map_err(invalid)?;
            Ok(CompareRefs {
                base: event.before,
                head: event.after,
            })
        }
        other => Err(ConfigError::UnsupportedEvent(other.to_string())),
    }
}

/// Read the payload at `path` and extract the comparison refs.
pub fn refs_from_event_file(event_name: &str, path: &Path) -> Result<CompareRefs, ConfigError> {
    let payload = std::fs::read_to_string(path).map_err(|e| ConfigError::EventPayload {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let refs = refs_from_event(event_name, &payload)?;
    debug!(base = %refs.base, head = %refs.head, "Resolved refs from {} event", event_name);
    Ok(refs)
}

/// Combine explicit refs with the event payload.
///
/// Explicit refs win; the event is only read when at least one ref is missing.
pub fn resolve_refs(
    base: Option<String>,
    head: Option<String>,
    event_name: Option<&str>,
    event_path: Option<&Path>,
) -> Result<CompareRefs, ConfigError> {
    if let (Some(base), Some(head)) = (&base, &head) {
        return Ok(CompareRefs {
            base: base.clone(),
            head: head.clone(),
        });
    }

    let from_event = match (event_name, event_path) {
        (Some(name), Some(path)) => Some(refs_from_event_file(name, path)?),
        _ => None,
    };

    let base = base
        .or_else(|| from_event.as_ref().map(|r| r.base.clone()))
        .ok_or(ConfigError::MissingRef("base ref"))?;
    let head = head
        .or_else(|| from_event.as_ref().map(|r| r.head.clone()))
        .ok_or(ConfigError::MissingRef("head ref"))?;

    Ok(CompareRefs { base, head })
}

/// Split `owner/name` into its parts.
pub fn parse_repository(slug: &str) -> Result<(String, String), ConfigError> {
    let slug = slug.trim().trim_end_matches(".git");
    match slug.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(ConfigError::InvalidRepository(slug.to_string())),
    }
}
