//! Decide whether the matrix is built from the change set or from every repository file.

use std::fmt;

use tracing::info;

use super::change::ChangedFile;
use super::config::MatrixConfig;

/// Which collection the aggregator runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    ChangesOnly,
    FullRepository,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::ChangesOnly => f.write_str("changes only"),
            InputMode::FullRepository => f.write_str("full repository"),
        }
    }
}

/// Why the full repository listing was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackTrigger {
    /// These default-pattern globs matched at least one changed path.
    DefaultPatterns(Vec<String>),
    /// `defaults` is enabled and no changed path matched the pattern.
    NoMatches,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackDecision {
    pub mode: InputMode,
    pub trigger: Option<FallbackTrigger>,
}

impl FallbackDecision {
    fn changes_only() -> Self {
        Self {
            mode: InputMode::ChangesOnly,
            trigger: None,
        }
    }

    fn full_repository(trigger: FallbackTrigger) -> Self {
        Self {
            mode: InputMode::FullRepository,
            trigger: Some(trigger),
        }
    }
}

/// Pick the input mode for `changes`.
///
/// Default patterns take precedence over the `defaults` flag. Rename sources
/// count as changed paths only under the `split` rename policy.
pub fn decide(config: &MatrixConfig, changes: &[ChangedFile]) -> FallbackDecision {
    let paths: Vec<&str> = if config.rename_policy.counts_rename_source() {
        changes.iter().flat_map(ChangedFile::paths).collect()
    } else {
        changes.iter().map(|file| file.path.as_str()).collect()
    };

    let globs = &config.default_patterns;
    if paths.iter().any(|path| globs.matches_any(path)) {
        let matched = globs.matched_by(paths.iter().copied());
        info!("Files changed in default patterns: {}", matched.join(", "));
        return FallbackDecision::full_repository(FallbackTrigger::DefaultPatterns(matched));
    }

    if config.defaults && !paths.iter().any(|path| config.pattern.is_match(path)) {
        info!(
            "No changed file matches '{}', falling back to every file in the repository",
            config.pattern.as_str()
        );
        return FallbackDecision::full_repository(FallbackTrigger::NoMatches);
    }

    FallbackDecision::changes_only()
}
