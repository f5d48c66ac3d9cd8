//! # Error Module
//!
//! Error types for the photo classifier.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-file isolation** - only pre-flight errors stop a run

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Placement error: {0}")]
    Placement(#[from] PlacementError),

    #[error("Organize error: {0}")]
    Organize(#[from] OrganizeError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while enumerating sources or the destination tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source file not found: {path}")]
    MissingSource { path: PathBuf },

    #[error("Destination does not exist: {path}")]
    DestinationMissing { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while extracting a capture timestamp or tags
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Couldn't stat file {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed capture date '{value}' in {path}: {reason}")]
    Parse {
        path: PathBuf,
        value: String,
        reason: String,
    },

    #[error("Failed to read metadata from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while computing where a file should go
#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("Name collision for {path} and the disambiguated name is also taken")]
    DoubleCollision { path: PathBuf },

    #[error("Cannot determine a file name for {path}")]
    InvalidFileName { path: PathBuf },
}

/// Errors that occur while creating directories or moving files
#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("Failed to create {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} -> {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ClassifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_includes_path() {
        let error = ScanError::MissingSource {
            path: PathBuf::from("/photos/gone.jpg"),
        };
        assert!(error.to_string().contains("/photos/gone.jpg"));
    }

    #[test]
    fn parse_error_includes_value_and_path() {
        let error = MetadataError::Parse {
            path: PathBuf::from("/photos/broken.jpg"),
            value: "2021:13:45".to_string(),
            reason: "input is out of range".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("2021:13:45"));
    }

    #[test]
    fn nested_errors_convert_into_top_level() {
        let error: ClassifyError = PlacementError::DoubleCollision {
            path: PathBuf::from("/archive/2021/01/02/IMG_5_1.jpg"),
        }
        .into();
        assert!(matches!(error, ClassifyError::Placement(_)));
        assert!(error.to_string().contains("IMG_5_1.jpg"));
    }
}
