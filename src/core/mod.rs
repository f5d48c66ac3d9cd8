//! # Core Module
//!
//! The duplicate-aware placement engine.
//!
//! ## Modules
//! - `scanner` - Enumerates source files and buckets them by media kind
//! - `metadata` - Capture timestamps and EXIF tag mappings
//! - `index` - Point-in-time snapshot of the destination tree
//! - `matcher` - Finds an existing file with the same or renumbered name
//! - `comparator` - Decides whether two files are the same capture
//! - `placement` - Resolves the final destination of one file
//! - `organize` - Executes decisions through a `FileOps` capability
//! - `pipeline` - Orchestrates a full batch run

pub mod comparator;
pub mod index;
pub mod matcher;
pub mod metadata;
pub mod organize;
pub mod pipeline;
pub mod placement;
pub mod scanner;

// Re-export commonly used types
pub use index::DestinationIndex;
pub use metadata::{MetadataExtractor, TagMapping};
pub use placement::{PlacementDecision, PlacementResolver};
pub use scanner::{MediaFile, MediaKind};
