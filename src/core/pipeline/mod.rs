//! # Pipeline Module
//!
//! Orchestrates a full run:
//! 1. Pre-flight: destination root must exist, duplicate directory is created
//! 2. Index: snapshot the destination tree once
//! 3. Scan: enumerate and bucket source files
//! 4. Place: resolve and move each file, isolating per-file failures
//!
//! ## Example
//! ```rust,ignore
//! let result = Pipeline::builder()
//!     .source("/Volumes/CARD/DCIM")
//!     .destination("/Users/me/Photos")
//!     .duplicate_dir("/Users/me/duplicates")
//!     .dry_run(true)
//!     .build()
//!     .run()?;
//! ```

mod executor;

pub use executor::{
    ClassifyConfig, FileOutcome, FileRecord, Pipeline, PipelineBuilder, PipelineResult,
};
