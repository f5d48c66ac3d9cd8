//! Pipeline execution implementation.

use crate::core::index::DestinationIndex;
use crate::core::metadata::{ExifExtractor, MetadataExtractor};
use crate::core::organize::{DryRunFileOps, FileOps, FsFileOps, OrganizeExecutor};
use crate::core::placement::{PlacementDecision, PlacementKind, PlacementResolver};
use crate::core::scanner::{MediaFile, SourceFile, SourceScanner};
use crate::error::{ClassifyError, ScanError};
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PlaceEvent, PlaceProgress,
    RunSummary,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

/// What happened to one source file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum FileOutcome {
    Placed { decision: PlacementDecision },
    Missing,
    Failed { message: String },
}

/// Per-file record of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Result of pipeline execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub summary: RunSummary,
    /// One record per source file, in processing order
    pub records: Vec<FileRecord>,
    /// Non-fatal errors (missing sources, unreadable entries, failed files)
    pub errors: Vec<String>,
}

impl PipelineResult {
    /// Whether every file was handled without error
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// File or directory to process
    pub source: PathBuf,
    /// Root of the `YYYY/MM/DD` archive tree
    pub destination: PathBuf,
    /// Holding directory for duplicates
    pub duplicate_dir: PathBuf,
    /// Resolve everything but create and move nothing
    pub dry_run: bool,
}

/// Builder for pipeline configuration
#[derive(Default)]
pub struct PipelineBuilder {
    config: ClassifyConfig,
    extractor: Option<Box<dyn MetadataExtractor>>,
    ops: Option<Box<dyn FileOps>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a complete configuration
    pub fn config(mut self, config: ClassifyConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the file or directory to process
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.config.source = source.into();
        self
    }

    /// Set the archive root
    pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.config.destination = destination.into();
        self
    }

    /// Set the duplicate holding directory
    pub fn duplicate_dir(mut self, duplicate_dir: impl Into<PathBuf>) -> Self {
        self.config.duplicate_dir = duplicate_dir.into();
        self
    }

    /// Suppress directory creation and moves
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Set the metadata extractor
    pub fn extractor(mut self, extractor: Box<dyn MetadataExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set the filesystem capability, overriding the dry-run choice
    pub fn file_ops(mut self, ops: Box<dyn FileOps>) -> Self {
        self.ops = Some(ops);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        let dry_run = self.config.dry_run;
        Pipeline {
            config: self.config,
            extractor: self
                .extractor
                .unwrap_or_else(|| Box::new(ExifExtractor::new())),
            ops: self.ops.unwrap_or_else(|| {
                if dry_run {
                    Box::new(DryRunFileOps)
                } else {
                    Box::new(FsFileOps)
                }
            }),
        }
    }
}

/// One sequential reconciliation pass over a source
pub struct Pipeline {
    config: ClassifyConfig,
    extractor: Box<dyn MetadataExtractor>,
    ops: Box<dyn FileOps>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &ClassifyConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, ClassifyError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    ///
    /// Only pre-flight failures return `Err`; once files are being processed
    /// each failure is recorded and the batch continues.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, ClassifyError> {
        let start_time = Instant::now();
        let dry_run = self.ops.is_dry_run();

        events.send(Event::Pipeline(PipelineEvent::Started { dry_run }));

        // Phase 1: pre-flight and destination snapshot
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Indexing,
        }));

        let (index, index_errors) = match self.preflight() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                events.send(Event::Pipeline(PipelineEvent::Error {
                    message: e.to_string(),
                }));
                return Err(e);
            }
        };

        let mut errors: Vec<String> = index_errors.iter().map(ToString::to_string).collect();
        let mut records = Vec::new();
        let mut summary = RunSummary {
            dry_run,
            ..Default::default()
        };

        // Phase 2: source enumeration
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scan = SourceScanner::new().scan_with_events(&self.config.source, events);
        errors.extend(scan.errors.iter().map(ToString::to_string));

        for missing in &scan.missing {
            tracing::warn!(error = %missing, "source skipped");
            errors.push(missing.to_string());
            summary.missing += 1;
            if let ScanError::MissingSource { path } = missing {
                records.push(FileRecord {
                    path: path.clone(),
                    outcome: FileOutcome::Missing,
                });
            }
        }

        // Phase 3: resolve and move, simple media first
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Placing,
        }));

        let total = scan.total_files();
        summary.total_files = total;
        events.send(Event::Place(PlaceEvent::Started { total_files: total }));

        let resolver = PlacementResolver::new(
            &index,
            &self.config.destination,
            &self.config.duplicate_dir,
            self.extractor.as_ref(),
        );
        let mut executor = OrganizeExecutor::new(self.ops.as_ref());

        for (i, source) in scan.simple.iter().chain(&scan.rich).enumerate() {
            events.send(Event::Place(PlaceEvent::Progress(PlaceProgress {
                completed: i + 1,
                total,
                current_path: source.path.clone(),
            })));

            match self.place_file(source, &resolver, &mut executor) {
                Ok(decision) => {
                    tally(&mut summary, &decision.kind);
                    events.send(Event::Place(PlaceEvent::Placed {
                        path: source.path.clone(),
                        destination: decision.destination.clone(),
                        kind: decision.kind.clone(),
                        quarantine: decision.quarantine.clone(),
                    }));
                    records.push(FileRecord {
                        path: source.path.clone(),
                        outcome: FileOutcome::Placed { decision },
                    });
                }
                Err(e) => {
                    tracing::warn!(path = %source.path.display(), error = %e, "file skipped");
                    summary.failed += 1;
                    let message = e.to_string();
                    events.send(Event::Place(PlaceEvent::Failed {
                        path: source.path.clone(),
                        message: message.clone(),
                    }));
                    errors.push(message.clone());
                    records.push(FileRecord {
                        path: source.path.clone(),
                        outcome: FileOutcome::Failed { message },
                    });
                }
            }
        }

        events.send(Event::Place(PlaceEvent::Completed {
            placed: total - summary.failed,
            failed: summary.failed,
        }));

        summary.folders_created = executor.folders_created();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: summary.clone(),
        }));

        Ok(PipelineResult {
            summary,
            records,
            errors,
        })
    }

    /// Check the destination, snapshot it, and make sure the duplicate directory exists
    fn preflight(&self) -> Result<(DestinationIndex, Vec<ScanError>), ClassifyError> {
        if !self.config.destination.is_dir() {
            return Err(ScanError::DestinationMissing {
                path: self.config.destination.clone(),
            }
            .into());
        }

        let snapshot = DestinationIndex::build(&self.config.destination)?;

        if !self.config.duplicate_dir.exists() {
            self.ops.create_dir_all(&self.config.duplicate_dir)?;
        }

        Ok(snapshot)
    }

    fn place_file(
        &self,
        source: &SourceFile,
        resolver: &PlacementResolver<'_>,
        executor: &mut OrganizeExecutor<'_>,
    ) -> Result<PlacementDecision, ClassifyError> {
        let file = MediaFile::load(source, self.extractor.as_ref())?;
        tracing::debug!(
            path = %file.path.display(),
            timestamp = %file.timestamp,
            tags = file.tags.len(),
            "metadata extracted"
        );

        let decision = resolver.resolve(&file)?;
        executor.apply(&decision)?;
        Ok(decision)
    }
}

fn tally(summary: &mut RunSummary, kind: &PlacementKind) {
    match kind {
        PlacementKind::Simple | PlacementKind::New => summary.archived += 1,
        PlacementKind::Disambiguated => {
            summary.archived += 1;
            summary.renamed += 1;
        }
        PlacementKind::DuplicateOfExisting { .. } | PlacementKind::ReplacesMatch { .. } => {
            summary.duplicates += 1
        }
    }
}
