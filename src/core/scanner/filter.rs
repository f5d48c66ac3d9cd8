//! Extension filtering for source and destination files.

use super::MediaKind;
use std::collections::HashSet;
use std::path::Path;

/// Classifies files by extension
pub struct MediaFilter {
    /// Extensions carrying EXIF tags
    rich: HashSet<String>,
    /// Extensions dated by filesystem birth time only
    simple: HashSet<String>,
}

impl MediaFilter {
    /// Create a filter accepting `.jpg`/`.jpeg` (rich) and `.mov` (simple)
    pub fn new() -> Self {
        Self {
            rich: ["jpg", "jpeg"].iter().map(|e| e.to_string()).collect(),
            simple: ["mov"].iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Media kind of a path, or `None` when the extension is not handled
    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        let ext = lowercase_extension(path)?;
        if self.rich.contains(&ext) {
            Some(MediaKind::Rich)
        } else if self.simple.contains(&ext) {
            Some(MediaKind::Simple)
        } else {
            None
        }
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        self.classify(path).is_some()
    }

    /// Check if a file carries EXIF tags
    pub fn is_rich(&self, path: &Path) -> bool {
        self.classify(path) == Some(MediaKind::Rich)
    }
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased extension without the dot
pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}
