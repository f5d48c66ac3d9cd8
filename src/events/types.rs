//! Event type definitions for progress reporting.

use crate::core::placement::{FileMove, PlacementKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Source enumeration events
    Scan(ScanEvent),
    /// Per-file placement events
    Place(PlaceEvent),
    /// Run-level events
    Pipeline(PipelineEvent),
}

/// Events during source enumeration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Enumeration has started
    Started { source: PathBuf },
    /// A source file does not exist
    Missing { path: PathBuf },
    /// An entry could not be read but enumeration continues
    Error { path: PathBuf, message: String },
    /// Enumeration completed
    Completed {
        simple_files: usize,
        rich_files: usize,
    },
}

/// Events while resolving and moving files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaceEvent {
    /// Placement has started
    Started { total_files: usize },
    /// A file is about to be resolved
    Progress(PlaceProgress),
    /// A file was placed (or would be, in a dry run)
    Placed {
        path: PathBuf,
        destination: PathBuf,
        kind: PlacementKind,
        quarantine: Option<FileMove>,
    },
    /// A file failed; the batch continues
    Failed { path: PathBuf, message: String },
    /// Placement completed
    Completed { placed: usize, failed: usize },
}

/// Progress information during placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceProgress {
    /// Files handled so far, including this one
    pub completed: usize,
    /// Total number of files to place
    pub total: usize,
    /// File being resolved
    pub current_path: PathBuf,
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Run has started
    Started { dry_run: bool },
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Run completed
    Completed { summary: RunSummary },
    /// Run aborted before processing any file
    Error { message: String },
}

/// Phases of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Indexing,
    Scanning,
    Placing,
}

/// Summary of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Source files found
    pub total_files: usize,
    /// Files filed into the archive tree
    pub archived: usize,
    /// Files sent to the duplicate directory
    pub duplicates: usize,
    /// Files given a `_1` name
    pub renamed: usize,
    /// Sources that did not exist
    pub missing: usize,
    /// Files that failed to resolve or move
    pub failed: usize,
    /// Directories created in the archive
    pub folders_created: usize,
    pub dry_run: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Indexing => write!(f, "Indexing destination"),
            PipelinePhase::Scanning => write!(f, "Scanning source"),
            PipelinePhase::Placing => write!(f, "Placing files"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Place(PlaceEvent::Progress(PlaceProgress {
            completed: 3,
            total: 10,
            current_path: PathBuf::from("/card/IMG_0003.jpg"),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Place(PlaceEvent::Progress(p)) => {
                assert_eq!(p.completed, 3);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn run_summary_is_serializable() {
        let summary = RunSummary {
            total_files: 120,
            archived: 100,
            duplicates: 15,
            renamed: 3,
            failed: 2,
            dry_run: true,
            ..Default::default()
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"duplicates\":15"));
        assert!(json.contains("\"dry_run\":true"));
    }
}
