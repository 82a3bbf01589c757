//! Comparison range resolution.

use git2::{Oid, Repository};
use tracing::{debug, warn};

use crate::error::GitError;

/// Resolved comparison range with start and end OIDs.
///
/// `from` is the merge base of the two refs, so the diff covers only what
/// `to` introduced (the same semantics as GitHub's `base...head` compare).
#[derive(Debug, Clone)]
pub struct CompareRange {
    pub from: Oid,
    pub to: Oid,
    pub from_ref: String,
    pub to_ref: String,
}

/// Resolve a comparison range from user-provided references.
///
/// If `head` is None, uses HEAD.
pub fn resolve_range(
    repo: &Repository,
    base: &str,
    head: Option<&str>,
) -> Result<CompareRange, GitError> {
    let to_ref = head.unwrap_or("HEAD");
    let to_oid = resolve_reference(repo, to_ref)?;
    let base_oid = resolve_reference(repo, base)?;

    let from_oid = match repo.merge_base(base_oid, to_oid) {
        Ok(oid) => oid,
        Err(e) => {
            warn!(
                "No merge base between {} and {}: {}. Comparing against {} directly.",
                base, to_ref, e, base
            );
            base_oid
        }
    };

    debug!(from = %from_oid, to = %to_oid, "Resolved comparison range");

    Ok(CompareRange {
        from: from_oid,
        to: to_oid,
        from_ref: base.to_string(),
        to_ref: to_ref.to_string(),
    })
}

/// Resolve a reference (tag, branch, commit hash) to a commit OID.
pub fn resolve_reference(repo: &Repository, reference: &str) -> Result<Oid, GitError> {
    // Try as a direct OID first
    if let Ok(oid) = Oid::from_str(reference)
        && repo.find_commit(oid).is_ok()
    {
        return Ok(oid);
    }

    match repo.revparse_single(reference) {
        Ok(obj) => obj
            .peel_to_commit()
            .map(|commit| commit.id())
            .map_err(|e| GitError::ReferenceNotFound(reference.to_string(), e)),
        Err(e) => Err(GitError::ReferenceNotFound(reference.to_string(), e)),
    }
}
