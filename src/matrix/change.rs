//! Changed files and their statuses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a changed file as reported by the change-set provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Unknown,
}

impl ChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Added => "added",
            ChangeStatus::Modified => "modified",
            ChangeStatus::Deleted => "deleted",
            ChangeStatus::Renamed => "renamed",
            ChangeStatus::Unknown => "unknown",
        }
    }

    /// Map a host-reported status string (GitHub compare API naming) to a status.
    ///
    /// Unrecognized values become `Unknown` rather than an error, since a new
    /// host status should not break matrix generation.
    pub fn from_host(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "added" | "copied" => ChangeStatus::Added,
            "modified" | "changed" => ChangeStatus::Modified,
            "removed" | "deleted" => ChangeStatus::Deleted,
            "renamed" => ChangeStatus::Renamed,
            _ => ChangeStatus::Unknown,
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of the change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub path: String,
    pub status: ChangeStatus,
    /// Source path for renamed files (None for non-rename changes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_path: Option<String>,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, status: ChangeStatus) -> Self {
        Self {
            path: path.into(),
            status,
            previous_path: None,
        }
    }

    pub fn renamed(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: to.into(),
            status: ChangeStatus::Renamed,
            previous_path: Some(from.into()),
        }
    }

    /// A file from the full repository listing: no real change status.
    pub fn listed(path: impl Into<String>) -> Self {
        Self::new(path, ChangeStatus::Unknown)
    }

    /// Destination path and, for renames, the source path.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.path.as_str()).chain(self.previous_path.as_deref())
    }
}

/// Summary of the statuses that contributed to one matrix entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    Status(ChangeStatus),
    /// Two or more distinct statuses contributed.
    Ambiguous,
}

impl Reason {
    /// Fold another status into this reason. Commutative, associative and idempotent.
    pub fn merge(self, other: Reason) -> Reason {
        if self == other { self } else { Reason::Ambiguous }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Status(status) => status.as_str(),
            Reason::Ambiguous => "?",
        }
    }
}

impl From<ChangeStatus> for Reason {
    fn from(status: ChangeStatus) -> Self {
        Reason::Status(status)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Reason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
