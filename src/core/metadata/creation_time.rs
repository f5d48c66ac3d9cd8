//! Filesystem birth time lookup, one implementation per target OS.

use crate::error::MetadataError;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Source of a file's creation (birth) time
///
/// Implement this trait to substitute a fixed clock in tests.
pub trait CreationTimeProvider: Send + Sync {
    /// Birth time of the file at `path`; never the modification time
    fn creation_time(&self, path: &Path) -> Result<SystemTime, MetadataError>;
}

/// Reads birth time from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCreationTime;

impl CreationTimeProvider for SystemCreationTime {
    fn creation_time(&self, path: &Path) -> Result<SystemTime, MetadataError> {
        fs::metadata(path)
            .and_then(|metadata| birth_time(&metadata))
            .map_err(|source| MetadataError::Stat {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(target_os = "macos")]
fn birth_time(metadata: &Metadata) -> io::Result<SystemTime> {
    use std::os::macos::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let secs = metadata.st_birthtime();
    let nanos = metadata.st_birthtime_nsec() as u32;
    if secs >= 0 {
        Ok(UNIX_EPOCH + Duration::new(secs as u64, nanos))
    } else {
        Ok(UNIX_EPOCH - Duration::new(secs.unsigned_abs(), 0))
    }
}

#[cfg(windows)]
fn birth_time(metadata: &Metadata) -> io::Result<SystemTime> {
    use std::os::windows::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    // FILETIME counts 100ns intervals since 1601-01-01
    const INTERVALS_PER_SEC: u64 = 10_000_000;
    const EPOCH_DIFFERENCE_SECS: u64 = 11_644_473_600;

    let intervals = metadata.creation_time();
    let secs = intervals / INTERVALS_PER_SEC;
    let nanos = ((intervals % INTERVALS_PER_SEC) * 100) as u32;
    secs.checked_sub(EPOCH_DIFFERENCE_SECS)
        .map(|unix_secs| UNIX_EPOCH + Duration::new(unix_secs, nanos))
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "creation time before 1970"))
}

#[cfg(not(any(target_os = "macos", windows)))]
fn birth_time(metadata: &Metadata) -> io::Result<SystemTime> {
    // statx on Linux; Unsupported where the filesystem keeps no birth time
    metadata.created()
}
