//! Resolves where one media file should go.

use super::types::*;
use crate::core::comparator::ContentComparator;
use crate::core::index::DestinationIndex;
use crate::core::matcher::find_match;
use crate::core::metadata::MetadataExtractor;
use crate::core::scanner::{MediaFile, MediaKind};
use crate::error::{ClassifyError, MetadataError, PlacementError};
use chrono::{Datelike, NaiveDateTime};
use std::path::{Path, PathBuf};

/// `YYYY/MM/DD` directory for a capture timestamp
pub fn date_subdirectory(timestamp: &NaiveDateTime) -> PathBuf {
    [
        format!("{:04}", timestamp.year()),
        format!("{:02}", timestamp.month()),
        format!("{:02}", timestamp.day()),
    ]
    .iter()
    .collect()
}

/// `IMG_5.jpg` becomes `IMG_5_1.jpg`
pub fn disambiguated_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let new_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_1.{}", stem, ext),
        None => format!("{}_1", stem),
    };
    path.with_file_name(new_name)
}

/// Decides the destination of each file against a destination snapshot
///
/// Resolution never touches the filesystem beyond reading tags of existing
/// destination files, so resolving the same file twice against the same
/// index gives the same decision.
pub struct PlacementResolver<'a> {
    index: &'a DestinationIndex,
    destination_root: &'a Path,
    duplicate_dir: &'a Path,
    extractor: &'a dyn MetadataExtractor,
}

impl<'a> PlacementResolver<'a> {
    pub fn new(
        index: &'a DestinationIndex,
        destination_root: &'a Path,
        duplicate_dir: &'a Path,
        extractor: &'a dyn MetadataExtractor,
    ) -> Self {
        Self {
            index,
            destination_root,
            duplicate_dir,
            extractor,
        }
    }

    /// Resolve the destination of one file
    pub fn resolve(&self, file: &MediaFile) -> Result<PlacementDecision, ClassifyError> {
        let basename = file.basename().ok_or_else(|| PlacementError::InvalidFileName {
            path: file.path.clone(),
        })?;

        let subdir = date_subdirectory(&file.timestamp);
        let target_dir = self.destination_root.join(&subdir);
        let candidate = target_dir.join(basename);

        // Simple media is never reconciled; a same-named file is overwritten.
        if file.kind == MediaKind::Simple {
            return Ok(self.place(file, candidate, PlacementKind::Simple));
        }

        let comparator = ContentComparator::new(self.extractor);

        if self.index.contains(&subdir, basename) {
            if self.same_capture(&comparator, file, &candidate)? {
                tracing::info!(source = %file.path.display(), existing = %candidate.display(), "already archived");
                return Ok(PlacementDecision {
                    source: file.path.clone(),
                    destination: self.duplicate_dir.join(basename),
                    quarantine: None,
                    kind: PlacementKind::DuplicateOfExisting {
                        existing: candidate,
                    },
                });
            }

            let renamed = disambiguated_path(&candidate);
            let renamed_taken = renamed
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| self.index.contains(&subdir, name));
            if renamed_taken {
                return Err(PlacementError::DoubleCollision { path: renamed }.into());
            }

            tracing::info!(source = %file.path.display(), destination = %renamed.display(), "name taken by a different capture");
            return Ok(self.place(file, renamed, PlacementKind::Disambiguated));
        }

        let existing = self.index.files_in(&subdir);

        if let Some(name) = find_match(&existing, basename) {
            let matched = target_dir.join(name);
            if self.same_capture(&comparator, file, &matched)? {
                return Ok(self.replace_match(file, basename, matched, candidate, MatchMethod::Name));
            }
            return Ok(self.place(file, candidate, PlacementKind::New));
        }

        for name in &existing {
            let path = target_dir.join(name);
            if self.same_capture(&comparator, file, &path)? {
                return Ok(self.replace_match(file, basename, path, candidate, MatchMethod::ContentScan));
            }
        }

        Ok(self.place(file, candidate, PlacementKind::New))
    }

    /// A vanished destination file is not a match
    fn same_capture(
        &self,
        comparator: &ContentComparator<'_>,
        file: &MediaFile,
        existing: &Path,
    ) -> Result<bool, MetadataError> {
        if file.tags.is_empty() {
            return Ok(false);
        }
        if !existing.exists() {
            tracing::debug!(path = %existing.display(), "indexed file no longer exists");
            return Ok(false);
        }
        comparator.same_capture(&file.tags, existing)
    }

    fn place(&self, file: &MediaFile, destination: PathBuf, kind: PlacementKind) -> PlacementDecision {
        PlacementDecision {
            source: file.path.clone(),
            destination,
            quarantine: None,
            kind,
        }
    }

    fn replace_match(
        &self,
        file: &MediaFile,
        basename: &str,
        matched: PathBuf,
        candidate: PathBuf,
        by: MatchMethod,
    ) -> PlacementDecision {
        tracing::info!(
            source = %file.path.display(),
            matched = %matched.display(),
            ?by,
            "same capture archived under another name"
        );
        PlacementDecision {
            source: matched.clone(),
            destination: candidate,
            quarantine: Some(FileMove {
                from: file.path.clone(),
                to: self.duplicate_dir.join(basename),
            }),
            kind: PlacementKind::ReplacesMatch { matched, by },
        }
    }
}
