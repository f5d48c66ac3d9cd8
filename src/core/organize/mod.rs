//! File organization module.
//!
//! Carries out placement decisions: creates date directories and moves
//! files, either for real or as a dry run.

mod executor;
mod ops;

pub use executor::OrganizeExecutor;
pub use ops::{DryRunFileOps, FileOps, FsFileOps};
