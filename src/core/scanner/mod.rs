//! # Scanner Module
//!
//! Enumerates source files and buckets them by media kind.
//!
//! ## Media Kinds
//! - Rich: JPEG (.jpg, .jpeg), carries EXIF tags and is checked for duplicates
//! - Simple: QuickTime (.mov), dated by filesystem birth time and never deduplicated
//!
//! ## Example
//! ```rust,ignore
//! use photo_classify::core::scanner::SourceScanner;
//!
//! let scan = SourceScanner::new().scan(Path::new("/Volumes/CARD/DCIM"));
//! for file in scan.simple.iter().chain(&scan.rich) { /* ... */ }
//! ```

mod filter;
mod walker;

pub use filter::{lowercase_extension, MediaFilter};
pub use walker::{ScanResult, SourceScanner};

use crate::core::metadata::{MetadataExtractor, TagMapping, TimestampSource};
use crate::error::MetadataError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Whether a format carries embedded tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Image with EXIF tags
    Rich,
    /// Untagged media such as video containers
    Simple,
}

/// A source file discovered by the scanner, before metadata extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Lowercase extension without the dot, empty if none
    pub extension: String,
    pub kind: MediaKind,
}

impl SourceFile {
    pub fn new(path: PathBuf, kind: MediaKind) -> Self {
        let extension = lowercase_extension(&path).unwrap_or_default();
        Self {
            path,
            extension,
            kind,
        }
    }
}

/// One file under consideration, with its derived capture metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub extension: String,
    pub kind: MediaKind,
    pub timestamp: NaiveDateTime,
    pub timestamp_source: TimestampSource,
    /// Empty for simple media
    pub tags: TagMapping,
}

impl MediaFile {
    /// Extract metadata for a discovered source file
    pub fn load(
        source: &SourceFile,
        extractor: &dyn MetadataExtractor,
    ) -> Result<Self, MetadataError> {
        let info = extractor.extract(&source.path, source.kind)?;
        Ok(Self {
            path: source.path.clone(),
            extension: source.extension.clone(),
            kind: source.kind,
            timestamp: info.timestamp,
            timestamp_source: info.source,
            tags: info.tags,
        })
    }

    /// Final path component as UTF-8
    pub fn basename(&self) -> Option<&str> {
        basename(&self.path)
    }
}

pub(crate) fn basename(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_file_lowercases_extension() {
        let file = SourceFile::new(PathBuf::from("/card/IMG_0001.JPG"), MediaKind::Rich);
        assert_eq!(file.extension, "jpg");
    }

    #[test]
    fn source_file_without_extension() {
        let file = SourceFile::new(PathBuf::from("/card/README"), MediaKind::Simple);
        assert_eq!(file.extension, "");
    }

    #[test]
    fn basename_is_last_component() {
        assert_eq!(basename(Path::new("/a/b/IMG_5.jpg")), Some("IMG_5.jpg"));
        assert_eq!(basename(Path::new("/")), None);
    }
}
