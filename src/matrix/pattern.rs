//! Named-group pattern matching against a single path.

use std::fmt;

use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Matrix key that every entry carries; no group may use it.
pub const REASON_KEY: &str = "reason";

/// Key used for per-path entries of an ungrouped pattern.
pub const PATH_KEY: &str = "path";

/// How a pattern without named groups aggregates its matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UngroupedPolicy {
    /// Every match lands in the single global bucket.
    #[default]
    Global,
    /// Every matched path is its own entry, keyed by `path`.
    Path,
}

/// Options that affect how a pattern is compiled and how matches are keyed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternOptions {
    /// Require the match to start at the beginning of the path.
    pub anchored: bool,
    pub ungrouped: UngroupedPolicy,
}

/// Captured group values of one match, in the pattern's declaration order.
///
/// Two tuples are equal when they have the same names and values; this is the
/// identity used to group changed files into matrix entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GroupTuple(Vec<(String, String)>);

impl GroupTuple {
    pub fn new(values: Vec<(String, String)>) -> Self {
        Self(values)
    }

    /// The bucket used by patterns without named groups.
    pub fn global() -> Self {
        Self(Vec::new())
    }

    pub fn is_global(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GroupTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global() {
            return f.write_str("<global>");
        }
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        f.write_str(&parts.join(","))
    }
}

/// A compiled matrix pattern.
#[derive(Debug, Clone)]
pub struct MatrixPattern {
    source: String,
    regex: Regex,
    group_names: Vec<String>,
    ungrouped: UngroupedPolicy,
}

impl MatrixPattern {
    /// Compile an unanchored pattern with the global ungrouped policy.
    pub fn new(source: &str) -> Result<Self, ConfigError> {
        Self::with_options(source, PatternOptions::default())
    }

    pub fn with_options(source: &str, options: PatternOptions) -> Result<Self, ConfigError> {
        let compiled = if options.anchored {
            format!("^(?:{source})")
        } else {
            source.to_string()
        };

        let regex = Regex::new(&compiled).map_err(|e| ConfigError::InvalidPattern {
            pattern: source.to_string(),
            source: Box::new(e),
        })?;

        let group_names: Vec<String> = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();

        if let Some(reserved) = group_names.iter().find(|name| *name == REASON_KEY) {
            return Err(ConfigError::ReservedGroupName(reserved.clone()));
        }

        Ok(Self {
            source: source.to_string(),
            regex,
            group_names,
            ungrouped: options.ungrouped,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    /// Match the pattern anywhere in `path` and extract the named groups of the leftmost match.
    ///
    /// Groups that did not participate in the match capture the empty string.
    pub fn captures(&self, path: &str) -> Option<GroupTuple> {
        let caps = match self.regex.captures(path) {
            Ok(Some(caps)) => caps,
            Ok(None) => return None,
            Err(e) => {
                warn!("Pattern '{}' failed on '{}': {}. Treating as no match.", self.source, path, e);
                return None;
            }
        };

        if self.group_names.is_empty() {
            return Some(match self.ungrouped {
                UngroupedPolicy::Global => GroupTuple::global(),
                UngroupedPolicy::Path => {
                    GroupTuple::new(vec![(PATH_KEY.to_string(), path.to_string())])
                }
            });
        }

        let values = self
            .group_names
            .iter()
            .map(|name| {
                let value = caps.name(name).map(|m| m.as_str()).unwrap_or_default();
                (name.clone(), value.to_string())
            })
            .collect();

        Some(GroupTuple::new(values))
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }
}
