//! Matrix generation: fallback decision followed by aggregation.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CollaboratorError, MatrixError};
use crate::source::{ChangeSetProvider, RepositoryLister};

use super::aggregate::{Aggregation, MatrixEntry};
use super::change::ChangedFile;
use super::config::MatrixConfig;
use super::fallback::{FallbackDecision, InputMode, decide};

/// The generated job matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    pub entries: Vec<MatrixEntry>,
    pub mode: InputMode,
}

/// `{"include": [...]}`, the shape GitHub Actions expects for `strategy.matrix`.
#[derive(Serialize)]
struct IncludeMatrix<'a> {
    include: &'a [MatrixEntry],
}

impl Matrix {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// An empty matrix means downstream jobs should be skipped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    pub fn to_include_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&IncludeMatrix {
            include: &self.entries,
        })
    }
}

/// Build the matrix from an in-memory change set.
///
/// `list_all_files` is only called when the fallback decider selects the full
/// repository.
pub fn build_matrix<F>(
    config: &MatrixConfig,
    changes: &[ChangedFile],
    list_all_files: F,
) -> Result<Matrix, CollaboratorError>
where
    F: FnOnce() -> Result<Vec<String>, CollaboratorError>,
{
    let FallbackDecision { mode, .. } = decide(config, changes);

    let aggregation = match mode {
        InputMode::ChangesOnly => {
            Aggregation::collect(&config.pattern, config.rename_policy, changes)
        }
        InputMode::FullRepository => {
            info!("Listing all files in repository matching the provided pattern");
            let listed: Vec<ChangedFile> = list_all_files()?
                .into_iter()
                .map(ChangedFile::listed)
                .collect();
            debug!("Repository listing returned {} files", listed.len());

            let mut aggregation =
                Aggregation::collect(&config.pattern, config.rename_policy, &listed);
            if config.keep_change_reasons {
                aggregation.override_reasons(&Aggregation::collect(
                    &config.pattern,
                    config.rename_policy,
                    changes,
                ));
            }
            aggregation
        }
    };

    info!("Generated {} matrix entries ({})", aggregation.len(), mode);

    Ok(Matrix {
        entries: aggregation.into_entries(),
        mode,
    })
}

/// Fetch the change set, decide the input mode, and aggregate.
pub async fn generate_matrix<C, L>(
    config: &MatrixConfig,
    provider: &C,
    lister: &L,
) -> Result<Matrix, MatrixError>
where
    C: ChangeSetProvider + ?Sized,
    L: RepositoryLister + ?Sized,
{
    let changes = provider
        .get_changes()
        .await
        .map_err(MatrixError::Changes)?;
    info!("Found {} changed files", changes.len());

    build_matrix(config, &changes, || lister.list_all_files()).map_err(MatrixError::Listing)
}
