//! # Comparator Module
//!
//! Decides whether two files are the same capture from their EXIF tags.
//!
//! The comparison is asymmetric: every tag of the incoming file must be
//! present in the other file with an identical value, while extra tags on
//! the other side are ignored. A missing tag means "different file", never
//! an error. Ambiguity always resolves towards keeping both files.

use crate::core::metadata::{MetadataExtractor, TagMapping};
use crate::error::MetadataError;
use std::path::Path;

/// Whether `other` carries every tag in `required` with the same value
///
/// An empty `required` mapping never agrees: a file with no tags cannot be
/// told apart from anything.
pub fn tags_agree(required: &TagMapping, other: &TagMapping) -> bool {
    if required.is_empty() {
        return false;
    }

    required.iter().all(|(key, value)| match other.get(key) {
        Some(other_value) => other_value == value,
        None => {
            tracing::trace!(key = %key, "tag missing on existing file");
            false
        }
    })
}

/// Compares a file's tags against files on disk
pub struct ContentComparator<'a> {
    extractor: &'a dyn MetadataExtractor,
}

impl<'a> ContentComparator<'a> {
    pub fn new(extractor: &'a dyn MetadataExtractor) -> Self {
        Self { extractor }
    }

    /// Read the tags of `other` and check them against `tags`
    pub fn same_capture(&self, tags: &TagMapping, other: &Path) -> Result<bool, MetadataError> {
        let other_tags = self.extractor.read_tags(other)?;
        Ok(tags_agree(tags, &other_tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn mapping(pairs: &[(&str, &str)]) -> TagMapping {
        pairs.iter().copied().collect()
    }

    struct CannedTags(HashMap<PathBuf, TagMapping>);

    impl MetadataExtractor for CannedTags {
        fn read_tags(&self, path: &Path) -> Result<TagMapping, MetadataError> {
            self.0.get(path).cloned().ok_or_else(|| MetadataError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }

        fn creation_time(&self, path: &Path) -> Result<NaiveDateTime, MetadataError> {
            Err(MetadataError::Stat {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::Unsupported),
            })
        }
    }

    #[test]
    fn identical_tags_agree() {
        let a = mapping(&[("EXIF DateTimeOriginal", "2021:01:02 00:00:00"), ("Image Make", "Canon")]);
        assert!(tags_agree(&a, &a.clone()));
    }

    #[test]
    fn differing_value_disagrees() {
        let a = mapping(&[("EXIF DateTimeOriginal", "2021:01:02 00:00:00")]);
        let b = mapping(&[("EXIF DateTimeOriginal", "2021:01:02 00:00:01")]);
        assert!(!tags_agree(&a, &b));
    }

    #[test]
    fn comparison_is_over_required_keys_only() {
        let a = mapping(&[("A", "1"), ("B", "2")]);
        let only_a = mapping(&[("A", "1")]);
        let superset = mapping(&[("A", "1"), ("B", "2"), ("C", "3")]);

        assert!(!tags_agree(&a, &only_a));
        assert!(tags_agree(&only_a, &a));
        assert!(tags_agree(&a, &superset));
    }

    #[test]
    fn empty_required_never_agrees() {
        assert!(!tags_agree(&TagMapping::new(), &mapping(&[("A", "1")])));
        assert!(!tags_agree(&TagMapping::new(), &TagMapping::new()));
    }

    #[test]
    fn same_capture_reads_other_side() {
        let existing = PathBuf::from("/archive/2021/01/02/IMG_5.jpg");
        let extractor = CannedTags(HashMap::from([(
            existing.clone(),
            mapping(&[("A", "1"), ("Z", "9")]),
        )]));
        let comparator = ContentComparator::new(&extractor);

        assert!(comparator.same_capture(&mapping(&[("A", "1")]), &existing).unwrap());
        assert!(!comparator.same_capture(&mapping(&[("A", "2")]), &existing).unwrap());
    }

    #[test]
    fn unreadable_other_side_is_an_error() {
        let extractor = CannedTags(HashMap::new());
        let comparator = ContentComparator::new(&extractor);

        let result = comparator.same_capture(&mapping(&[("A", "1")]), Path::new("/gone.jpg"));
        assert!(result.is_err());
    }
}
