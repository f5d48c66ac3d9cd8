//! # Index Module
//!
//! Point-in-time snapshot of the destination tree.
//!
//! The index maps each directory, relative to the destination root, to the
//! JPEG names present when it was built. It is never refreshed during a run:
//! files moved by the run itself are not visible to later lookups.

use crate::core::scanner::{basename, MediaFilter};
use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Relative directory to the set of JPEG names it contained at build time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationIndex {
    dirs: BTreeMap<PathBuf, BTreeSet<String>>,
}

impl DestinationIndex {
    /// Walk `root` once and record every directory's JPEG names
    ///
    /// The root itself is keyed by the empty path. Unreadable entries are
    /// returned alongside the index rather than failing the build.
    pub fn build(root: &Path) -> Result<(Self, Vec<ScanError>), ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DestinationMissing {
                path: root.to_path_buf(),
            });
        }

        let filter = MediaFilter::new();
        let mut index = Self::default();
        let mut errors = Vec::new();

        for entry_result in WalkDir::new(root) {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    tracing::warn!(path = %path.display(), error = %e, "cannot index entry");
                    errors.push(ScanError::ReadDirectory {
                        path,
                        source: std::io::Error::other(e.to_string()),
                    });
                    continue;
                }
            };

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };

            if entry.file_type().is_dir() {
                index.dirs.entry(relative.to_path_buf()).or_default();
            } else if entry.file_type().is_file() && filter.is_rich(path) {
                if let (Some(parent), Some(name)) = (relative.parent(), basename(path)) {
                    index
                        .dirs
                        .entry(parent.to_path_buf())
                        .or_default()
                        .insert(name.to_string());
                }
            }
        }

        tracing::debug!(
            directories = index.dirs.len(),
            files = index.total_files(),
            "destination indexed"
        );

        Ok((index, errors))
    }

    /// Names recorded for `dir`, empty when the directory was not present
    pub fn files_in(&self, dir: &Path) -> Vec<&str> {
        self.dirs
            .get(dir)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether `name` was present in `dir` at build time
    pub fn contains(&self, dir: &Path, name: &str) -> bool {
        self.dirs.get(dir).is_some_and(|names| names.contains(name))
    }

    /// Whether `dir` existed at build time
    pub fn has_directory(&self, dir: &Path) -> bool {
        self.dirs.contains_key(dir)
    }

    pub fn directory_count(&self) -> usize {
        self.dirs.len()
    }

    pub fn total_files(&self) -> usize {
        self.dirs.values().map(BTreeSet::len).sum()
    }

    /// Record a name, for assembling an index by hand
    pub fn insert(&mut self, dir: impl Into<PathBuf>, name: impl Into<String>) {
        self.dirs.entry(dir.into()).or_default().insert(name.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn missing_root_is_destination_missing() {
        let result = DestinationIndex::build(Path::new("/nonexistent/archive"));
        assert!(matches!(result, Err(ScanError::DestinationMissing { .. })));
    }

    #[test]
    fn records_jpeg_names_by_relative_directory() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("2023/04/12/IMG_0001.jpg"));
        touch(&root.path().join("2023/04/12/IMG_0002.JPEG"));
        touch(&root.path().join("2023/04/12/clip.mov"));
        touch(&root.path().join("top.jpg"));

        let (index, errors) = DestinationIndex::build(root.path()).unwrap();

        assert!(errors.is_empty());
        assert_eq!(
            index.files_in(Path::new("2023/04/12")),
            vec!["IMG_0001.jpg", "IMG_0002.JPEG"]
        );
        assert!(index.contains(Path::new(""), "top.jpg"));
        assert!(!index.contains(Path::new("2023/04/12"), "clip.mov"));
    }

    #[test]
    fn empty_directories_are_known() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("2020/01/01")).unwrap();

        let (index, _) = DestinationIndex::build(root.path()).unwrap();

        assert!(index.has_directory(Path::new("2020/01/01")));
        assert!(index.files_in(Path::new("2020/01/01")).is_empty());
        assert!(index.files_in(Path::new("1999/01/01")).is_empty());
    }

    #[test]
    fn index_is_a_snapshot() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("2021/01/02/IMG_5.jpg"));

        let (index, _) = DestinationIndex::build(root.path()).unwrap();
        touch(&root.path().join("2021/01/02/IMG_6.jpg"));

        assert_eq!(index.files_in(Path::new("2021/01/02")), vec!["IMG_5.jpg"]);
        assert!(!index.contains(Path::new("2021/01/02"), "IMG_6.jpg"));
    }
}
