//! # CLI Module
//!
//! Command-line interface for the photo classifier.
//!
//! ## Usage
//! ```bash
//! # File a memory card into ~/Dropbox/Photos/YYYY/MM/DD
//! photo-classify /Volumes/CARD/DCIM
//!
//! # Custom archive and duplicate directory
//! photo-classify ./import -d ~/Archive --duplicate-dir ~/Archive-dups
//!
//! # See what would happen
//! photo-classify ./import --dry-run --verbose
//!
//! # JSON output
//! photo-classify ./import --output json
//! ```

use photo_classify::core::pipeline::{FileOutcome, Pipeline, PipelineResult};
use photo_classify::core::placement::PlacementKind;
use photo_classify::error::Result;
use photo_classify::events::{Event, EventChannel, PipelineEvent, PlaceEvent, ScanEvent};
use clap::{Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

/// Photo Classify - file photos and videos into a dated archive
#[derive(Parser, Debug)]
#[command(name = "photo-classify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File or directory to classify
    source: PathBuf,

    /// Root of the YYYY/MM/DD archive
    #[arg(
        short,
        long,
        env = "PHOTO_CLASSIFY_DESTINATION",
        default_value = "~/Dropbox/Photos"
    )]
    destination: PathBuf,

    /// Where duplicates are moved
    #[arg(
        long,
        env = "PHOTO_CLASSIFY_DUPLICATE_DIR",
        default_value = "~/temp/duplicate"
    )]
    duplicate_dir: PathBuf,

    /// Show what would be moved without touching any file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Print every decision, not only moves
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (one line per move)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let term = Term::stderr();
    let pretty = matches!(cli.output, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Photo Classify").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        if cli.dry_run {
            term.write_line(&format!("{}", style("Dry run: nothing will be moved").yellow()))
                .ok();
        }
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder()
        .source(expand_tilde(&cli.source))
        .destination(expand_tilde(&cli.destination))
        .duplicate_dir(expand_tilde(&cli.duplicate_dir))
        .dry_run(cli.dry_run)
        .build();

    let (sender, receiver) = EventChannel::new();

    let progress = if pretty {
        let pb = ProgressBar::new(0);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = cli.verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Missing { path }) => {
                    pb.println(format!(
                        "  {} {} does not exist",
                        style("✗").red(),
                        display_path(&path)
                    ));
                }
                Event::Place(PlaceEvent::Started { total_files }) => {
                    pb.set_length(total_files as u64);
                }
                Event::Place(PlaceEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    pb.set_message(
                        p.current_path
                            .file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .into_owned(),
                    );
                }
                Event::Place(PlaceEvent::Placed {
                    path,
                    destination,
                    kind,
                    quarantine,
                }) => {
                    if let Some(q) = quarantine {
                        pb.println(format!(
                            "  {} {} -> {}",
                            style("dup").yellow(),
                            display_path(&q.from),
                            display_path(&q.to)
                        ));
                    }
                    let moved = !matches!(kind, PlacementKind::DuplicateOfExisting { .. });
                    if moved || verbose {
                        pb.println(format!(
                            "  {} {} -> {}",
                            kind_label(&kind),
                            display_path(&path),
                            display_path(&destination)
                        ));
                    }
                }
                Event::Place(PlaceEvent::Failed { path, message }) => {
                    pb.println(format!(
                        "  {} {}: {}",
                        style("✗").red(),
                        display_path(&path),
                        message
                    ));
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let result = result?;

    match cli.output {
        OutputFormat::Pretty => print_pretty_results(&term, &result),
        OutputFormat::Json => print_json_results(&result),
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    Ok(if result.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_pretty_results(term: &Term, result: &PipelineResult) {
    let summary = &result.summary;

    term.write_line("").ok();
    term.write_line(&format!(
        "{} {}",
        style("✓").green().bold(),
        if summary.dry_run {
            "Dry Run Complete"
        } else {
            "Classification Complete"
        }
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files processed in {:.1}s",
        style(summary.total_files).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!("  {} archived", style(summary.archived).cyan()))
        .ok();
    if summary.renamed > 0 {
        term.write_line(&format!(
            "  {} renamed to avoid a name clash",
            style(summary.renamed).cyan()
        ))
        .ok();
    }
    term.write_line(&format!(
        "  {} duplicates",
        style(summary.duplicates).yellow()
    ))
    .ok();
    term.write_line(&format!(
        "  {} folders created",
        style(summary.folders_created).dim()
    ))
    .ok();

    if !result.errors.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style(format!("{} problems:", result.errors.len())).red().bold()
        ))
        .ok();
        for error in &result.errors {
            term.write_line(&format!("  {} {}", style("✗").red(), error)).ok();
        }
    }
}

fn print_json_results(result: &PipelineResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to serialize result: {}", e),
    }
}

fn print_minimal_results(result: &PipelineResult) {
    for record in &result.records {
        match &record.outcome {
            FileOutcome::Placed { decision } => {
                for file_move in decision.moves() {
                    println!("{}\t{}", file_move.from.display(), file_move.to.display());
                }
            }
            FileOutcome::Missing => println!("{}\tmissing", record.path.display()),
            FileOutcome::Failed { message } => {
                println!("{}\terror: {}", record.path.display(), message)
            }
        }
    }
}

fn kind_label(kind: &PlacementKind) -> String {
    match kind {
        PlacementKind::Simple | PlacementKind::New => style(kind.to_string()).green().to_string(),
        PlacementKind::Disambiguated => style(kind.to_string()).cyan().to_string(),
        _ => style(kind.to_string()).yellow().to_string(),
    }
}

fn display_path(path: &Path) -> String {
    let home = dirs::home_dir().unwrap_or_default();
    match path.strip_prefix(&home) {
        Ok(rest) if !home.as_os_str().is_empty() => format!("~/{}", rest.display()),
        _ => path.display().to_string(),
    }
}

/// Replace a leading `~` with the home directory
fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_uses_home_directory() {
        let Some(home) = dirs::home_dir() else {
            return;
        };

        assert_eq!(
            expand_tilde(Path::new("~/Dropbox/Photos")),
            home.join("Dropbox/Photos")
        );
        assert_eq!(expand_tilde(Path::new("~")), home);
    }

    #[test]
    fn expand_tilde_leaves_other_paths() {
        assert_eq!(expand_tilde(Path::new("/srv/photos")), PathBuf::from("/srv/photos"));
        assert_eq!(expand_tilde(Path::new("~user/x")), PathBuf::from("~user/x"));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "photo-classify",
            "/card",
            "-d",
            "/archive",
            "--duplicate-dir",
            "/dups",
            "-n",
            "-o",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.source, PathBuf::from("/card"));
        assert_eq!(cli.destination, PathBuf::from("/archive"));
        assert_eq!(cli.duplicate_dir, PathBuf::from("/dups"));
        assert!(cli.dry_run);
        assert!(matches!(cli.output, OutputFormat::Json));
    }
}
