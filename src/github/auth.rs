//! GitHub authentication detection.
//!
//! Auth order:
//! 1. Explicit token (`--github-token` / `GITHUB_TOKEN` through clap)
//! 2. `gh auth token` (gh CLI)
//! 3. GITHUB_TOKEN environment variable
//! 4. GH_TOKEN environment variable

use std::env;
use std::process::Command;

use crate::error::ConfigError;

/// Get a GitHub token, preferring `explicit` when it is non-empty.
pub fn get_github_token(explicit: Option<&str>) -> Result<String, ConfigError> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    if let Some(token) = get_token_from_gh_cli() {
        return Ok(token);
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = env::var(var)
            && !token.is_empty()
        {
            return Ok(token);
        }
    }

    Err(ConfigError::MissingToken)
}

/// Try to get a token from the gh CLI.
fn get_token_from_gh_cli() -> Option<String> {
    which::which("gh").ok()?;

    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}
