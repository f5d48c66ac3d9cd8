//! Placement resolution.
//!
//! Computes, for one media file, its final `YYYY/MM/DD` destination and
//! whether it (or an equivalent archived file) goes to the duplicate directory.

mod resolver;
mod types;

pub use resolver::{date_subdirectory, disambiguated_path, PlacementResolver};
pub use types::*;
