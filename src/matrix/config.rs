//! Validated, immutable configuration for one matrix invocation.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::globs::DefaultPatterns;
use super::pattern::{MatrixPattern, PatternOptions, UngroupedPolicy};

/// How renamed files contribute statuses to matrix entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenamePolicy {
    /// Destination counts as added; the source counts as deleted only when both
    /// sides match and map to different entries.
    #[default]
    Added,
    /// Both sides count as renamed; the source only when both sides match and
    /// map to different entries.
    Renamed,
    /// Destination counts as added and the source as deleted whenever it matches.
    Split,
}

impl RenamePolicy {
    /// Whether a rename source counts as a changed path on its own.
    pub fn counts_rename_source(self) -> bool {
        self == RenamePolicy::Split
    }
}

/// Everything the fallback decider and aggregator need, validated up front.
#[derive(Debug, Clone)]
pub struct MatrixConfig {
    pub pattern: MatrixPattern,
    /// Aggregate over the whole repository when no changed file matches.
    pub defaults: bool,
    pub default_patterns: DefaultPatterns,
    pub rename_policy: RenamePolicy,
    /// In full-repository mode, keep the change-set reason for entries that also changed.
    pub keep_change_reasons: bool,
}

impl MatrixConfig {
    pub fn new(pattern: MatrixPattern) -> Self {
        Self {
            pattern,
            defaults: false,
            default_patterns: DefaultPatterns::default(),
            rename_policy: RenamePolicy::default(),
            keep_change_reasons: false,
        }
    }

    /// Compile `pattern` with default options.
    pub fn from_pattern(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(MatrixPattern::new(pattern)?))
    }

    pub fn builder(pattern: impl Into<String>) -> MatrixConfigBuilder {
        MatrixConfigBuilder {
            pattern: pattern.into(),
            options: PatternOptions::default(),
            defaults: false,
            default_patterns: Vec::new(),
            rename_policy: RenamePolicy::default(),
            keep_change_reasons: false,
        }
    }

    pub fn with_defaults(mut self, defaults: bool) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_default_patterns(mut self, patterns: DefaultPatterns) -> Self {
        self.default_patterns = patterns;
        self
    }

    pub fn with_rename_policy(mut self, policy: RenamePolicy) -> Self {
        self.rename_policy = policy;
        self
    }

    pub fn with_keep_change_reasons(mut self, keep: bool) -> Self {
        self.keep_change_reasons = keep;
        self
    }
}

/// Collects raw options and validates them all at once in [`MatrixConfigBuilder::build`].
#[derive(Debug, Clone)]
pub struct MatrixConfigBuilder {
    pattern: String,
    options: PatternOptions,
    defaults: bool,
    default_patterns: Vec<String>,
    rename_policy: RenamePolicy,
    keep_change_reasons: bool,
}

impl MatrixConfigBuilder {
    pub fn anchored(mut self, anchored: bool) -> Self {
        self.options.anchored = anchored;
        self
    }

    pub fn ungrouped(mut self, policy: UngroupedPolicy) -> Self {
        self.options.ungrouped = policy;
        self
    }

    pub fn defaults(mut self, defaults: bool) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add default-pattern globs. Each item may itself be a newline-separated list.
    pub fn default_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in patterns {
            self.default_patterns
                .extend(item.as_ref().lines().map(str::to_string));
        }
        self
    }

    pub fn rename_policy(mut self, policy: RenamePolicy) -> Self {
        self.rename_policy = policy;
        self
    }

    pub fn keep_change_reasons(mut self, keep: bool) -> Self {
        self.keep_change_reasons = keep;
        self
    }

    pub fn build(self) -> Result<MatrixConfig, ConfigError> {
        let pattern = MatrixPattern::with_options(&self.pattern, self.options)?;
        let default_patterns = DefaultPatterns::new(&self.default_patterns)?;

        Ok(MatrixConfig {
            pattern,
            defaults: self.defaults,
            default_patterns,
            rename_policy: self.rename_policy,
            keep_change_reasons: self.keep_change_reasons,
        })
    }
}
