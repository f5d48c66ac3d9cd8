//! # Metadata Module
//!
//! Produces a capture timestamp and, for rich media, an EXIF tag mapping.
//!
//! ## Timestamp Sources
//! 1. `EXIF DateTimeOriginal` (when the photo was taken)
//! 2. `Image DateTime`
//! 3. Filesystem birth time (the only source for simple media such as `.mov`)
//!
//! EXIF dates carry no timezone and are used as local wall-clock time.
//! Birth times are converted to local time.

mod creation_time;
mod tags;

pub use creation_time::{CreationTimeProvider, SystemCreationTime};
pub use tags::{
    capture_date, parse_exif_datetime, read_exif_tags, TagMapping, DATE_TIME, DATE_TIME_ORIGINAL,
};

use crate::core::scanner::MediaKind;
use crate::error::MetadataError;
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where a capture timestamp came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// Embedded capture date tag
    Exif,
    /// Filesystem birth time
    CreationTime,
}

/// Everything extracted from one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureInfo {
    pub timestamp: NaiveDateTime,
    pub source: TimestampSource,
    /// Empty for simple media
    pub tags: TagMapping,
}

/// Trait for metadata extractors
///
/// Implement this trait to substitute canned metadata in tests.
pub trait MetadataExtractor: Send + Sync {
    /// Read the tag mapping of a rich file
    fn read_tags(&self, path: &Path) -> Result<TagMapping, MetadataError>;

    /// Filesystem birth time as local wall-clock time
    fn creation_time(&self, path: &Path) -> Result<NaiveDateTime, MetadataError>;

    /// Extract the capture timestamp and tags for a file of the given kind
    fn extract(&self, path: &Path, kind: MediaKind) -> Result<CaptureInfo, MetadataError> {
        if kind == MediaKind::Simple {
            return Ok(CaptureInfo {
                timestamp: self.creation_time(path)?,
                source: TimestampSource::CreationTime,
                tags: TagMapping::new(),
            });
        }

        let tags = self.read_tags(path)?;
        let (timestamp, source) = match capture_date(path, &tags)? {
            Some(date) => (date, TimestampSource::Exif),
            None => (self.creation_time(path)?, TimestampSource::CreationTime),
        };

        Ok(CaptureInfo {
            timestamp,
            source,
            tags,
        })
    }
}

/// Extractor backed by kamadak-exif and an OS creation-time provider
#[derive(Debug, Clone, Default)]
pub struct ExifExtractor<C = SystemCreationTime> {
    clock: C,
}

impl ExifExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: CreationTimeProvider> ExifExtractor<C> {
    /// Use a custom creation-time provider
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: CreationTimeProvider> MetadataExtractor for ExifExtractor<C> {
    fn read_tags(&self, path: &Path) -> Result<TagMapping, MetadataError> {
        read_exif_tags(path)
    }

    fn creation_time(&self, path: &Path) -> Result<NaiveDateTime, MetadataError> {
        let created = self.clock.creation_time(path)?;
        Ok(DateTime::<Local>::from(created).naive_local())
    }
}
