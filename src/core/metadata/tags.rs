//! EXIF tag mapping and capture-date parsing.

use crate::error::MetadataError;
use chrono::NaiveDateTime;
use exif::{Context, Field, In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Key of the original capture date/time tag
pub const DATE_TIME_ORIGINAL: &str = "EXIF DateTimeOriginal";

/// Key of the generic date/time tag
pub const DATE_TIME: &str = "Image DateTime";

/// Tag name to normalized textual value
///
/// Keys look like `"EXIF DateTimeOriginal"` or `"Image Make"`: the IFD group
/// followed by the tag name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMapping(BTreeMap<String, String>);

impl TagMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a TagMapping {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Read the EXIF tags of a JPEG without decoding the image data
///
/// Only the APP1 segment is parsed. A file that carries no (or unreadable)
/// EXIF yields an empty mapping; failing to open or read the file is an error.
pub fn read_exif_tags(path: &Path) -> Result<TagMapping, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::Io(source)) => {
            return Err(MetadataError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no usable EXIF");
            return Ok(TagMapping::new());
        }
    };

    Ok(exif
        .fields()
        .filter(|field| field.ifd_num == In::PRIMARY && is_capture_tag(field.tag))
        .map(|field| (tag_key(field.tag), tag_value(field)))
        .collect())
}

/// Parse a capture date from the mapping
///
/// `DateTimeOriginal` wins over `DateTime`. A malformed `DateTimeOriginal`
/// falls back to `DateTime`; `Ok(None)` means neither tag is present.
pub fn capture_date(path: &Path, tags: &TagMapping) -> Result<Option<NaiveDateTime>, MetadataError> {
    match (tags.get(DATE_TIME_ORIGINAL), tags.get(DATE_TIME)) {
        (Some(original), fallback) => match parse_exif_datetime(original) {
            Ok(date) => Ok(Some(date)),
            Err(reason) => match fallback.map(parse_exif_datetime) {
                Some(Ok(date)) => {
                    tracing::warn!(
                        path = %path.display(),
                        value = original,
                        "malformed DateTimeOriginal, using DateTime"
                    );
                    Ok(Some(date))
                }
                _ => Err(MetadataError::Parse {
                    path: path.to_path_buf(),
                    value: original.to_string(),
                    reason,
                }),
            },
        },
        (None, Some(value)) => parse_exif_datetime(value)
            .map(Some)
            .map_err(|reason| MetadataError::Parse {
                path: path.to_path_buf(),
                value: value.to_string(),
                reason,
            }),
        (None, None) => Ok(None),
    }
}

/// Parse `YYYY:MM:DD HH:MM:SS`
///
/// The colons of the date portion are rewritten to dashes first, so an
/// already dash-separated date parses as well.
pub fn parse_exif_datetime(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim().trim_end_matches('\0');
    let (date, time) = value
        .split_once(' ')
        .ok_or_else(|| "missing time portion".to_string())?;
    let normalized = format!("{} {}", date.replace(':', "-"), time.trim());
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S").map_err(|e| e.to_string())
}

// Pointer tags hold file offsets, which differ between otherwise identical captures.
fn is_capture_tag(tag: Tag) -> bool {
    !matches!(
        tag,
        Tag::MakerNote | Tag::ExifIFDPointer | Tag::GPSInfoIFDPointer | Tag::InteropIFDPointer
    )
}

fn tag_key(tag: Tag) -> String {
    let group = match tag.context() {
        Context::Tiff => "Image",
        Context::Exif => "EXIF",
        Context::Gps => "GPS",
        Context::Interop => "Interoperability",
        #[allow(unreachable_patterns)]
        _ => "Unknown",
    };
    format!("{} {}", group, tag)
}

fn tag_value(field: &Field) -> String {
    match field.value {
        Value::Ascii(ref parts) => parts
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).trim_end_matches('\0').trim().to_string())
            .collect::<Vec<_>>()
            .join(", "),
        _ => field.display_value().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_colon_separated_exif_date() {
        assert_eq!(
            parse_exif_datetime("2021:01:02 13:14:15").unwrap(),
            at(2021, 1, 2, 13, 14, 15)
        );
    }

    #[test]
    fn parses_dash_separated_date() {
        assert_eq!(
            parse_exif_datetime("2021-01-02 00:00:00").unwrap(),
            at(2021, 1, 2, 0, 0, 0)
        );
    }

    #[test]
    fn rejects_garbage_date() {
        assert!(parse_exif_datetime("not a date").is_err());
        assert!(parse_exif_datetime("2021:13:45 00:00:00").is_err());
        assert!(parse_exif_datetime("2021:01:02").is_err());
    }

    #[test]
    fn capture_date_prefers_original() {
        let tags: TagMapping = [
            (DATE_TIME_ORIGINAL, "2020:05:06 07:08:09"),
            (DATE_TIME, "2022:01:01 00:00:00"),
        ]
        .into_iter()
        .collect();
        let date = capture_date(Path::new("a.jpg"), &tags).unwrap();
        assert_eq!(date, Some(at(2020, 5, 6, 7, 8, 9)));
    }

    #[test]
    fn capture_date_falls_back_to_generic_tag() {
        let tags: TagMapping = [(DATE_TIME, "2022:01:01 10:00:00")].into_iter().collect();
        let date = capture_date(Path::new("a.jpg"), &tags).unwrap();
        assert_eq!(date, Some(at(2022, 1, 1, 10, 0, 0)));
    }

    #[test]
    fn malformed_original_uses_generic_tag() {
        let tags: TagMapping = [
            (DATE_TIME_ORIGINAL, "0000:00:00 00:00:00"),
            (DATE_TIME, "2022:01:01 10:00:00"),
        ]
        .into_iter()
        .collect();
        let date = capture_date(Path::new("a.jpg"), &tags).unwrap();
        assert_eq!(date, Some(at(2022, 1, 1, 10, 0, 0)));
    }

    #[test]
    fn malformed_date_without_fallback_is_parse_error() {
        let tags: TagMapping = [(DATE_TIME_ORIGINAL, "    :  :     :  :  ")].into_iter().collect();
        let result = capture_date(Path::new("a.jpg"), &tags);
        assert!(matches!(result, Err(MetadataError::Parse { .. })));
    }

    #[test]
    fn no_date_tags_is_none() {
        let tags: TagMapping = [("Image Make", "Canon")].into_iter().collect();
        assert_eq!(capture_date(Path::new("a.jpg"), &tags).unwrap(), None);
    }

    #[test]
    fn unreadable_file_is_read_error() {
        let result = read_exif_tags(Path::new("/nonexistent/IMG_0001.jpg"));
        assert!(matches!(result, Err(MetadataError::Read { .. })));
    }

    #[test]
    fn file_without_exif_has_no_tags() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("plain.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();

        assert!(read_exif_tags(&path).unwrap().is_empty());
    }
}
