//! # CLI Module
//!
//! Command-line interface for the image hygiene scanner.
//!
//! ## Usage
//! ```bash
//! # Scan a folder for duplicates and blurry images
//! image-hygiene scan ~/Pictures
//!
//! # Stricter blur threshold
//! image-hygiene scan ~/Pictures --threshold 60
//!
//! # JSON output ({"summary": ..., "details": ...})
//! image-hygiene scan ~/Pictures --output json
//!
//! # Permanently delete duplicates after the scan
//! image-hygiene scan ~/Pictures --auto-cleanup
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use image_hygiene::core::advisor::{CleanupAdvisor, RuleBasedAdvisor};
use image_hygiene::core::hasher::FingerprintAlgorithm;
use image_hygiene::core::pipeline::{ScanRequest, Scanner};
use image_hygiene::core::quality::DEFAULT_SHARPNESS_THRESHOLD;
use image_hygiene::core::reporter::ScanResponse;
use image_hygiene::error::Result;
use image_hygiene::events::{
    CleanupEvent, Event, EventChannel, ExtractEvent, PipelineEvent, ScanEvent,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::thread;

/// Image Hygiene - Find duplicate and blurry images
#[derive(Parser, Debug)]
#[command(name = "image-hygiene")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a folder for duplicate and low-quality images
    Scan {
        /// Folder to scan
        folder: String,

        /// Permanently delete duplicates after the scan
        #[arg(long)]
        auto_cleanup: bool,

        /// Sharpness below this is low quality
        #[arg(short, long, default_value_t = DEFAULT_SHARPNESS_THRESHOLD)]
        threshold: f64,

        /// Fingerprint algorithm
        #[arg(short, long, default_value = "perceptual")]
        algorithm: Algorithm,

        /// Fingerprint grid edge length
        #[arg(long, default_value_t = 8)]
        hash_size: u32,

        /// Worker threads (default: one per CPU)
        #[arg(long)]
        threads: Option<usize>,

        /// Skip hidden files and folders
        #[arg(long)]
        no_hidden: bool,

        /// Follow symbolic links
        #[arg(long)]
        follow_symlinks: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Print a cleanup plan after the results
        #[arg(long)]
        advise: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// DCT-based hash, robust to re-encoding (default)
    Perceptual,
    /// Mean hash, fastest
    Average,
    /// Gradient hash
    Difference,
    /// Gradient hash in both directions
    DoubleDifference,
}

impl From<Algorithm> for FingerprintAlgorithm {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Perceptual => FingerprintAlgorithm::Perceptual,
            Algorithm::Average => FingerprintAlgorithm::Average,
            Algorithm::Difference => FingerprintAlgorithm::Difference,
            Algorithm::DoubleDifference => FingerprintAlgorithm::DoubleDifference,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (duplicate paths only)
    Minimal,
}

/// Options for one `scan` invocation
struct ScanOptions {
    threshold: f64,
    algorithm: FingerprintAlgorithm,
    hash_size: u32,
    threads: Option<usize>,
    include_hidden: bool,
    follow_symlinks: bool,
    output: OutputFormat,
    advise: bool,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            folder,
            auto_cleanup,
            threshold,
            algorithm,
            hash_size,
            threads,
            no_hidden,
            follow_symlinks,
            output,
            advise,
            verbose,
        } => {
            image_hygiene::init_tracing(if verbose { "debug" } else { "warn" });

            let options = ScanOptions {
                threshold,
                algorithm: algorithm.into(),
                hash_size,
                threads,
                include_hidden: !no_hidden,
                follow_symlinks,
                output,
                advise,
                verbose,
            };
            let request = ScanRequest::new(folder, auto_cleanup);

            let result = run_scan(&request, &options);
            if let (Err(error), OutputFormat::Json) = (&result, options.output) {
                println!("{}", serde_json::json!({ "error": error.to_string() }));
            }
            result
        }
    }
}

fn run_scan(request: &ScanRequest, options: &ScanOptions) -> Result<()> {
    let term = Term::stderr();

    // Validate before printing anything
    let folder = request.folder()?;

    let mut builder = Scanner::builder()
        .sharpness_threshold(options.threshold)
        .algorithm(options.algorithm)
        .hash_size(options.hash_size)
        .include_hidden(options.include_hidden)
        .follow_symlinks(options.follow_symlinks);
    if let Some(threads) = options.threads {
        builder = builder.threads(threads);
    }
    let scanner = builder.build()?;

    if matches!(options.output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Image Hygiene").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line(&format!("  Scanning {}", display_path(&folder)))
            .ok();
        term.write_line(&format!(
            "  {}",
            style(options.algorithm.description()).dim()
        ))
        .ok();
        if request.auto_cleanup {
            term.write_line(&format!(
                "  {}",
                style("Auto-cleanup is on: duplicates will be permanently deleted").yellow()
            ))
            .ok();
        }
        term.write_line("").ok();
    }

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(options.output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = options.verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_message(format!("{}", phase));
                    }
                }
                Event::Scan(ScanEvent::Completed { total_images }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total_images as u64);
                    }
                }
                Event::Extract(ExtractEvent::Progress(p)) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(p.completed as u64);
                        if verbose {
                            pb.set_message(
                                p.current_path
                                    .file_name()
                                    .unwrap_or_default()
                                    .to_string_lossy()
                                    .to_string(),
                            );
                        }
                    }
                }
                Event::Cleanup(CleanupEvent::Started { targets }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.reset();
                        pb.set_length(targets as u64);
                        pb.set_message("Cleaning up");
                    }
                }
                Event::Cleanup(CleanupEvent::Deleted { .. })
                | Event::Cleanup(CleanupEvent::Failed { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.inc(1);
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Cancelled)
                | Event::Pipeline(PipelineEvent::Error { .. })
                | Event::Cleanup(CleanupEvent::Completed { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    let result = request.execute_with_events(&scanner, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let response = result?;

    match options.output {
        OutputFormat::Pretty => print_pretty_results(&term, &response, options.verbose),
        OutputFormat::Json => print_json_results(&response)?,
        OutputFormat::Minimal => print_minimal_results(&response),
    }

    if options.advise {
        let advisor = RuleBasedAdvisor::new();
        let advice = advisor.advise(&response.details)?;
        term.write_line("").ok();
        term.write_line(&format!(
            "{} {}",
            style("Cleanup plan").bold().underlined(),
            style(format!("({})", advisor.name())).dim()
        ))
        .ok();
        term.write_line(advice.trim_end()).ok();
    }

    Ok(())
}

fn print_pretty_results(term: &Term, response: &ScanResponse, verbose: bool) {
    let summary = &response.summary;
    let report = &response.details;

    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    // Summary
    term.write_line(&format!(
        "  {} images scanned",
        style(summary.total_images).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicates found",
        style(summary.duplicates_found).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} low-quality images",
        style(summary.low_quality_found).cyan()
    ))
    .ok();
    if report.deleted_files.is_some() {
        term.write_line(&format!(
            "  {} files deleted",
            style(summary.deleted_files).yellow()
        ))
        .ok();
    }
    if !report.unreadable.is_empty() {
        term.write_line(&format!(
            "  {} images could not be read",
            style(report.unreadable.len()).red()
        ))
        .ok();
    }
    term.write_line("").ok();

    if report.duplicates.is_empty() && report.low_quality.is_empty() {
        term.write_line(&format!("  {} Nothing to clean up!", style("🎉").green()))
            .ok();
    }

    if !report.duplicates.is_empty() {
        term.write_line(&format!("{}", style("Duplicates:").bold().underlined()))
            .ok();
        let deleted: HashSet<&Path> = report
            .deleted_files
            .iter()
            .flatten()
            .map(PathBuf::as_path)
            .collect();
        for pair in &report.duplicates {
            let marker = if deleted.contains(pair.duplicate.as_path()) {
                style("✗").red().to_string()
            } else {
                style("○").dim().to_string()
            };
            term.write_line(&format!(
                "  {} {} {} {}",
                marker,
                display_path(&pair.duplicate),
                style("copy of").dim(),
                display_path(&pair.original)
            ))
            .ok();
        }
        term.write_line("").ok();
    }

    if !report.low_quality.is_empty() {
        term.write_line(&format!("{}", style("Low quality:").bold().underlined()))
            .ok();
        for entry in &report.low_quality {
            term.write_line(&format!(
                "  {} {} {}",
                style("◌").yellow(),
                display_path(&entry.file),
                style(format!("(sharpness {:.2})", entry.blur_score)).dim()
            ))
            .ok();
        }
        term.write_line("").ok();
    }

    if verbose {
        for entry in &report.unreadable {
            term.write_line(&format!(
                "  {} {}: {}",
                style("!").red(),
                display_path(&entry.file),
                entry.reason
            ))
            .ok();
        }
        for entry in &report.walk_errors {
            term.write_line(&format!(
                "  {} skipped {}: {}",
                style("!").red(),
                display_path(&entry.path),
                entry.reason
            ))
            .ok();
        }
    }

    for (path, failure) in &report.deletion_failures {
        term.write_line(&format!(
            "  {} could not delete {}: {}",
            style("!").red(),
            display_path(path),
            failure
        ))
        .ok();
    }

    // Footer
    if report.deleted_files.is_none() {
        term.write_line(&format!(
            "{}",
            style("No files were deleted. Re-run with --auto-cleanup to remove duplicates.").dim()
        ))
        .ok();
    }
}

fn print_json_results(response: &ScanResponse) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

fn print_minimal_results(response: &ScanResponse) {
    for pair in &response.details.duplicates {
        println!("{}", pair.duplicate.display());
    }
}

/// Shorten paths under the home directory to `~/...`
fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => path.display().to_string(),
    }
}
