//! # Photo Classify
//!
//! Files photos and videos into a `YYYY/MM/DD` archive tree and sends
//! duplicates to a holding directory instead of overwriting anything.
//!
//! ## Architecture
//! - `core` - Metadata extraction, destination index, name matching,
//!   content comparison, placement resolution and the batch pipeline
//! - `events` - Per-file progress and decision events
//! - `error` - Error taxonomy

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{ClassifyError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    // A subscriber may already be installed by an embedding application.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
