//! Default-pattern globs: changes to shared paths that force a full matrix.

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::ConfigError;

/// Compiled list of default-pattern globs.
///
/// Matching follows shell `fnmatch`: `*` may cross `/`, `**` matches any
/// number of directories, `?` and `[...]` match single characters.
#[derive(Debug, Clone)]
pub struct DefaultPatterns {
    patterns: Vec<String>,
    set: GlobSet,
}

impl Default for DefaultPatterns {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl DefaultPatterns {
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob {
                glob: pattern.to_string(),
                source: e,
            })?;
            builder.add(glob);
            kept.push(pattern.to_string());
        }

        let set = builder.build().map_err(|e| ConfigError::InvalidGlob {
            glob: kept.join(", "),
            source: e,
        })?;

        Ok(Self {
            patterns: kept,
            set,
        })
    }

    /// Parse a newline-separated list, as passed through `DEFAULT_PATTERNS`.
    pub fn from_lines(lines: &str) -> Result<Self, ConfigError> {
        Self::new(lines.lines())
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Whether any glob matches `path`. Always false for an empty list.
    pub fn matches_any(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    /// The globs that match at least one of `paths`, in configuration order.
    pub fn matched_by<'a, I>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut hit = vec![false; self.patterns.len()];
        let mut indices = Vec::new();
        for path in paths {
            self.set.matches_into(path, &mut indices);
            for &index in &indices {
                hit[index] = true;
            }
        }

        self.patterns
            .iter()
            .zip(hit)
            .filter_map(|(pattern, hit)| hit.then(|| pattern.clone()))
            .collect()
    }
}
