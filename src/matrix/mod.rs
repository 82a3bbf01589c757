//! Matrix computation: pattern matching, fallback decision and aggregation.

pub mod aggregate;
pub mod change;
pub mod config;
pub mod fallback;
pub mod generate;
pub mod globs;
pub mod pattern;

pub use aggregate::{Aggregation, MatrixEntry};
pub use change::{ChangeStatus, ChangedFile, Reason};
pub use config::{MatrixConfig, MatrixConfigBuilder, RenamePolicy};
pub use fallback::{FallbackDecision, FallbackTrigger, InputMode, decide};
pub use generate::{Matrix, build_matrix, generate_matrix};
pub use globs::DefaultPatterns;
pub use pattern::{GroupTuple, MatrixPattern, PatternOptions, UngroupedPolicy};
