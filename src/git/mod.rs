//! Git operations using git2-rs.

pub mod diff;
pub mod index;
pub mod range;

pub use diff::{LocalDiff, changes_between};
pub use index::{IndexLister, tracked_files};
pub use range::{CompareRange, resolve_range};
