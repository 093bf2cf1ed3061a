//! Pipeline execution implementation.

use crate::core::extractor::{FeatureExtractor, ImageFeatures};
use crate::core::hasher::{FingerprintAlgorithm, HasherConfig};
use crate::core::quality::{SharpnessAnalyzer, DEFAULT_SHARPNESS_THRESHOLD};
use crate::core::reporter::{ReportBuilder, ScanReport};
use crate::core::scanner::{ImageWalker, WalkConfig};
use crate::error::{ConfigError, HygieneError, ScanError};
use crate::events::{
    null_sender, Event, EventSender, ExtractEvent, ExtractProgress, PipelineEvent,
    PipelinePhase, ScanEvent,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Cooperative cancellation flag shared between a caller and a running scan.
///
/// Checked between files; a cancelled scan returns
/// [`ScanError::Cancelled`] and no partial report.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that has not been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the scan to stop at the next file boundary
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Configuration for a scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Tree walk settings
    pub walk: WalkConfig,
    /// Fingerprint algorithm
    pub algorithm: FingerprintAlgorithm,
    /// Fingerprint grid edge length
    pub hash_size: u32,
    /// Scores strictly below this are low quality
    pub sharpness_threshold: f64,
    /// Worker threads for extraction (None = one per CPU)
    pub threads: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            walk: WalkConfig::default(),
            algorithm: FingerprintAlgorithm::Perceptual,
            hash_size: 8,
            sharpness_threshold: DEFAULT_SHARPNESS_THRESHOLD,
            threads: None,
        }
    }
}

/// Builder for [`Scanner`]
pub struct ScannerBuilder {
    config: ScanConfig,
    cancellation: CancellationToken,
}

impl ScannerBuilder {
    /// Builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Extensions to treat as images
    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.config.walk.extensions = Some(extensions);
        self
    }

    /// Include hidden files and directories
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.walk.include_hidden = include;
        self
    }

    /// Follow symbolic links while walking
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.walk.follow_symlinks = follow;
        self
    }

    /// Limit walk depth
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.config.walk.max_depth = depth;
        self
    }

    /// Set the fingerprint algorithm
    pub fn algorithm(mut self, algorithm: FingerprintAlgorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Set the fingerprint grid edge length
    pub fn hash_size(mut self, size: u32) -> Self {
        self.config.hash_size = size;
        self
    }

    /// Set the low-quality threshold
    pub fn sharpness_threshold(mut self, threshold: f64) -> Self {
        self.config.sharpness_threshold = threshold;
        self
    }

    /// Set the worker thread count
    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = Some(threads);
        self
    }

    /// Use a caller-held cancellation token
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Validate the configuration and build the scanner
    pub fn build(self) -> Result<Scanner, ConfigError> {
        let threshold = self.config.sharpness_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold { value: threshold });
        }
        if self.config.threads == Some(0) {
            return Err(ConfigError::InvalidThreadCount);
        }
        if let Some(ref extensions) = self.config.walk.extensions {
            if extensions.iter().all(|e| e.trim().trim_start_matches('.').is_empty()) {
                return Err(ConfigError::NoExtensions);
            }
        }

        let hasher = HasherConfig::new()
            .algorithm(self.config.algorithm)
            .hash_size(self.config.hash_size)
            .build()?;

        Ok(Scanner {
            extractor: FeatureExtractor::new(hasher, SharpnessAnalyzer::new()),
            config: self.config,
            cancellation: self.cancellation,
        })
    }
}

impl Default for ScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks a folder tree and produces a [`ScanReport`].
///
/// Stages:
/// 1. **Walk** the tree in canonical order, collecting candidate paths.
/// 2. **Extract** fingerprint and sharpness on a bounded worker pool.
/// 3. **Aggregate** on the calling thread, in canonical order, so the
///    first-seen original is the same for any thread count.
///
/// A scan never modifies the filesystem.
pub struct Scanner {
    config: ScanConfig,
    extractor: FeatureExtractor,
    cancellation: CancellationToken,
}

impl Scanner {
    /// Create a new scanner builder
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::new()
    }

    /// The configuration in effect
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan `root` without events
    pub fn run(&self, root: impl AsRef<Path>) -> Result<ScanReport, ScanError> {
        self.run_with_events(root, &null_sender())
    }

    /// Scan `root`, reporting progress on `events`
    pub fn run_with_events(
        &self,
        root: impl AsRef<Path>,
        events: &EventSender,
    ) -> Result<ScanReport, ScanError> {
        let root = root.as_ref();
        let start_time = Instant::now();

        events.send(Event::Pipeline(PipelineEvent::Started));

        let result = self.run_phases(root, events);

        match &result {
            Ok(report) => {
                info!(
                    root = %root.display(),
                    total_images = report.total_images,
                    duplicates = report.duplicates.len(),
                    low_quality = report.low_quality.len(),
                    unreadable = report.unreadable.len(),
                    duration_ms = start_time.elapsed().as_millis() as u64,
                    "scan complete"
                );
                events.send(Event::Pipeline(PipelineEvent::Completed {
                    summary: report.summary(),
                }));
            }
            Err(ScanError::Cancelled) => {
                info!(root = %root.display(), "scan cancelled");
                events.send(Event::Pipeline(PipelineEvent::Cancelled));
            }
            Err(error) => {
                events.send(Event::Pipeline(PipelineEvent::Error {
                    message: error.to_string(),
                }));
            }
        }

        result
    }

    fn run_phases(&self, root: &Path, events: &EventSender) -> Result<ScanReport, ScanError> {
        // Phase 1: Walking
        self.enter_phase(PipelinePhase::Walking, events);

        let walker = ImageWalker::new(root, &self.config.walk)?;
        let mut builder = ReportBuilder::new(root, self.config.sharpness_threshold);
        let paths = self.walk(walker, &mut builder, events)?;

        // Phase 2: Extracting
        self.enter_phase(PipelinePhase::Extracting, events);
        let features = self.extract_all(&paths, events)?;

        // Phase 3: Aggregating
        self.enter_phase(PipelinePhase::Aggregating, events);
        for image in &features {
            builder.record(image);
        }

        Ok(builder.finish())
    }

    fn enter_phase(&self, phase: PipelinePhase, events: &EventSender) {
        debug!(%phase, "entering phase");
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged { phase }));
    }

    fn check_cancelled(&self) -> Result<(), ScanError> {
        if self.cancellation.is_cancelled() {
            Err(ScanError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn walk(
        &self,
        walker: ImageWalker,
        builder: &mut ReportBuilder,
        events: &EventSender,
    ) -> Result<Vec<PathBuf>, ScanError> {
        events.send(Event::Scan(ScanEvent::Started {
            root: walker.root().to_path_buf(),
        }));

        let mut paths = Vec::new();
        for item in walker {
            self.check_cancelled()?;

            match item {
                Ok(path) => {
                    if events.is_active() {
                        events.send(Event::Scan(ScanEvent::ImageFound { path: path.clone() }));
                    }
                    paths.push(path);
                }
                Err(error) => {
                    events.send(Event::Scan(ScanEvent::Error {
                        path: error_path(&error),
                        message: error.to_string(),
                    }));
                    builder.record_walk_error(&error);
                }
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_images: paths.len(),
        }));

        Ok(paths)
    }

    fn extract_all(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<Vec<ImageFeatures>, ScanError> {
        let total = paths.len();
        events.send(Event::Extract(ExtractEvent::Started {
            total_images: total,
        }));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.thread_count())
            .thread_name(|i| format!("hygiene-worker-{}", i))
            .build()
            .map_err(|e| ScanError::WorkerPool(e.to_string()))?;

        let completed = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        let results: Vec<Option<ImageFeatures>> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    if self.cancellation.is_cancelled() {
                        return None;
                    }

                    let features = self.extractor.extract(path);

                    if let Some(error) = features.failure() {
                        failed.fetch_add(1, Ordering::SeqCst);
                        events.send(Event::Extract(ExtractEvent::Failed {
                            path: path.clone(),
                            message: error.to_string(),
                        }));
                    }

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if events.is_active() {
                        events.send(Event::Extract(ExtractEvent::Progress(ExtractProgress {
                            completed: done,
                            total,
                            current_path: path.clone(),
                        })));
                    }

                    Some(features)
                })
                .collect()
        });

        self.check_cancelled()?;

        let failed = failed.load(Ordering::SeqCst);
        events.send(Event::Extract(ExtractEvent::Completed {
            extracted: total - failed,
            failed,
        }));

        Ok(results.into_iter().flatten().collect())
    }

    fn thread_count(&self) -> usize {
        self.config.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

fn error_path(error: &ScanError) -> PathBuf {
    match error {
        ScanError::PermissionDenied { path }
        | ScanError::ReadEntry { path, .. }
        | ScanError::RootNotFound { path }
        | ScanError::NotADirectory { path } => path.clone(),
        _ => PathBuf::new(),
    }
}

/// Scan `root` with the default configuration.
///
/// Fails only if the root is missing or not a directory.
pub fn scan(root: impl AsRef<Path>) -> Result<ScanReport, HygieneError> {
    let scanner = Scanner::builder().build()?;
    Ok(scanner.run(root)?)
}
