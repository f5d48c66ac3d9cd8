//! Filesystem side effects behind a swappable capability.

use crate::error::OrganizeError;
use std::fs;
use std::io;
use std::path::Path;

/// Directory creation and file moves
///
/// Every side effect of a run goes through this trait, so a dry run only has
/// to supply an implementation that does nothing.
pub trait FileOps: Send + Sync {
    /// Create `path` and any missing parents
    fn create_dir_all(&self, path: &Path) -> Result<(), OrganizeError>;

    /// Move `from` to `to`, replacing `to` if it exists
    fn move_file(&self, from: &Path, to: &Path) -> Result<(), OrganizeError>;

    /// Whether side effects are suppressed
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Performs real filesystem operations
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileOps;

impl FileOps for FsFileOps {
    fn create_dir_all(&self, path: &Path) -> Result<(), OrganizeError> {
        fs::create_dir_all(path).map_err(|source| OrganizeError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<(), OrganizeError> {
        fs::rename(from, to)
            .or_else(|_| copy_then_remove(from, to))
            .map_err(|source| OrganizeError::Move {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            })
    }
}

// rename fails across filesystems; copy, verify the size, then delete the source
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let source_size = fs::metadata(from)?.len();
    fs::copy(from, to)?;

    let dest_size = fs::metadata(to)?.len();
    if dest_size != source_size {
        let _ = fs::remove_file(to);
        return Err(io::Error::other(format!(
            "Copy verification failed: source {} bytes, dest {} bytes",
            source_size, dest_size
        )));
    }

    fs::remove_file(from)
}

/// Suppresses every side effect
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunFileOps;

impl FileOps for DryRunFileOps {
    fn create_dir_all(&self, path: &Path) -> Result<(), OrganizeError> {
        tracing::debug!(path = %path.display(), "dry run: skip mkdir");
        Ok(())
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<(), OrganizeError> {
        tracing::debug!(from = %from.display(), to = %to.display(), "dry run: skip move");
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
