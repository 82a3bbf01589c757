//! Grouping of matched files into deduplicated matrix entries.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use super::change::{ChangeStatus, ChangedFile, Reason};
use super::config::RenamePolicy;
use super::pattern::{GroupTuple, MatrixPattern, REASON_KEY};

/// One row of the job matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixEntry {
    pub groups: GroupTuple,
    pub reason: Reason,
}

impl Serialize for MatrixEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len() + 1))?;
        for (name, value) in self.groups.iter() {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry(REASON_KEY, &self.reason)?;
        map.end()
    }
}

/// Ordered accumulation of group tuples and their folded reasons.
///
/// Entries keep the position of their first contributing match; later
/// matches only fold their status into the existing reason.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    entries: Vec<MatrixEntry>,
    index: HashMap<GroupTuple, usize>,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate `files` in order.
    pub fn collect<'a, I>(pattern: &MatrixPattern, policy: RenamePolicy, files: I) -> Self
    where
        I: IntoIterator<Item = &'a ChangedFile>,
    {
        let mut aggregation = Self::new();
        for file in files {
            aggregation.absorb(pattern, policy, file);
        }
        aggregation
    }

    /// Match one changed file and fold its status in.
    ///
    /// For renames the destination is folded first. The source follows only
    /// under `Split`, or when both sides match into different tuples.
    pub fn absorb(&mut self, pattern: &MatrixPattern, policy: RenamePolicy, file: &ChangedFile) {
        let destination = pattern.captures(&file.path);

        let previous = match (file.status, file.previous_path.as_deref()) {
            (ChangeStatus::Renamed, Some(previous)) => previous,
            _ => {
                if let Some(groups) = destination {
                    debug!("{} ({}) -> {}", file.path, file.status, groups);
                    self.insert(groups, file.status.into());
                }
                return;
            }
        };

        let (destination_status, source_status) = match policy {
            RenamePolicy::Added | RenamePolicy::Split => {
                (ChangeStatus::Added, ChangeStatus::Deleted)
            }
            RenamePolicy::Renamed => (ChangeStatus::Renamed, ChangeStatus::Renamed),
        };

        let source = pattern.captures(previous).filter(|groups| match policy {
            RenamePolicy::Split => true,
            RenamePolicy::Added | RenamePolicy::Renamed => {
                destination.as_ref().is_some_and(|destination| destination != groups)
            }
        });

        if let Some(groups) = destination {
            debug!("{} (renamed, {}) -> {}", file.path, destination_status, groups);
            self.insert(groups, destination_status.into());
        }

        if let Some(groups) = source {
            debug!("{} (rename source, {}) -> {}", previous, source_status, groups);
            self.insert(groups, source_status.into());
        }
    }

    fn insert(&mut self, groups: GroupTuple, reason: Reason) {
        match self.index.get(&groups) {
            Some(&position) => {
                let entry = &mut self.entries[position];
                entry.reason = entry.reason.merge(reason);
            }
            None => {
                self.index.insert(groups.clone(), self.entries.len());
                self.entries.push(MatrixEntry { groups, reason });
            }
        }
    }

    /// Combine a later partition into this one.
    ///
    /// New tuples from `other` are appended after the tuples of `self`, so
    /// merging in-order partitions of an input gives the same result as a
    /// single pass over it.
    pub fn merge(mut self, other: Aggregation) -> Aggregation {
        for entry in other.entries {
            self.insert(entry.groups, entry.reason);
        }
        self
    }

    /// Replace the reason of every tuple that also appears in `other`.
    pub fn override_reasons(&mut self, other: &Aggregation) {
        for entry in &mut self.entries {
            if let Some(reason) = other.reason(&entry.groups) {
                entry.reason = reason;
            }
        }
    }

    pub fn reason(&self, groups: &GroupTuple) -> Option<Reason> {
        self.index
            .get(groups)
            .map(|&position| self.entries[position].reason)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MatrixEntry] {
        &self.entries
    }

    /// Entries in first-seen order.
    pub fn into_entries(self) -> Vec<MatrixEntry> {
        self.entries
    }
}
