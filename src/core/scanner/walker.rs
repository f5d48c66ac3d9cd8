//! Source enumeration using walkdir.

use super::{filter::MediaFilter, MediaKind, SourceFile};
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use std::path::Path;
use walkdir::WalkDir;

/// Source files bucketed by kind, in walk order
#[derive(Debug, Default)]
pub struct ScanResult {
    pub simple: Vec<SourceFile>,
    pub rich: Vec<SourceFile>,
    /// Sources that do not exist
    pub missing: Vec<ScanError>,
    /// Directories that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}

impl ScanResult {
    pub fn total_files(&self) -> usize {
        self.simple.len() + self.rich.len()
    }
}

/// Walks a source file or directory
pub struct SourceScanner {
    filter: MediaFilter,
}

impl SourceScanner {
    pub fn new() -> Self {
        Self {
            filter: MediaFilter::new(),
        }
    }

    /// Scan without events
    pub fn scan(&self, source: &Path) -> ScanResult {
        self.scan_with_events(source, &null_sender())
    }

    /// Enumerate `source` and bucket what is found
    ///
    /// A directory is walked recursively and only handled extensions are
    /// kept. A single named file is always taken; anything that is not a
    /// JPEG is treated as simple media.
    pub fn scan_with_events(&self, source: &Path, events: &EventSender) -> ScanResult {
        events.send(Event::Scan(ScanEvent::Started {
            source: source.to_path_buf(),
        }));

        let mut result = ScanResult::default();

        if !source.exists() {
            let error = ScanError::MissingSource {
                path: source.to_path_buf(),
            };
            events.send(Event::Scan(ScanEvent::Missing {
                path: source.to_path_buf(),
            }));
            result.missing.push(error);
        } else if source.is_dir() {
            self.walk_directory(source, events, &mut result);
        } else {
            let kind = self.filter.classify(source).unwrap_or(MediaKind::Simple);
            push_file(&mut result, SourceFile::new(source.to_path_buf(), kind));
        }

        events.send(Event::Scan(ScanEvent::Completed {
            simple_files: result.simple.len(),
            rich_files: result.rich.len(),
        }));

        result
    }

    fn walk_directory(&self, root: &Path, events: &EventSender, result: &mut ScanResult) {
        let walker = WalkDir::new(root).sort_by_file_name();

        for entry_result in walker {
            match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if let Some(kind) = self.filter.classify(path) {
                        push_file(result, SourceFile::new(path.to_path_buf(), kind));
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    let error = ScanError::ReadDirectory {
                        path: path.clone(),
                        source: std::io::Error::other(e.to_string()),
                    };

                    tracing::warn!(error = %error, "skipping unreadable entry");
                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));

                    result.errors.push(error);
                }
            }
        }
    }
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn push_file(result: &mut ScanResult, file: SourceFile) {
    match file.kind {
        MediaKind::Rich => result.rich.push(file),
        MediaKind::Simple => result.simple.push(file),
    }
}
