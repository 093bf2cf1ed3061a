//! Single-consumer aggregation of per-image results.

use super::{LowQualityEntry, ScanReport, SkippedEntry, UnreadableEntry};
use crate::core::comparator::DuplicateGrouper;
use crate::core::extractor::ImageFeatures;
use crate::error::ScanError;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Accumulates a [`ScanReport`] one image at a time.
///
/// Records must arrive in canonical order for the first-seen tie-break to be
/// deterministic.
#[derive(Debug)]
pub struct ReportBuilder {
    root: PathBuf,
    threshold: f64,
    grouper: DuplicateGrouper,
    report: ScanReport,
}

impl ReportBuilder {
    /// Start a report for `root`, flagging scores below `threshold`
    pub fn new(root: impl Into<PathBuf>, threshold: f64) -> Self {
        let root = root.into();
        Self {
            report: ScanReport::empty(root.clone()),
            root,
            threshold,
            grouper: DuplicateGrouper::new(),
        }
    }

    /// Fold one image's features into the report.
    ///
    /// The image counts toward `total_images` whatever its outcome.
    pub fn record(&mut self, features: &ImageFeatures) {
        self.report.total_images += 1;

        match &features.fingerprint {
            Ok(fingerprint) => {
                if let Some(pair) = self.grouper.observe(&features.path, fingerprint) {
                    debug!(
                        original = %pair.original.display(),
                        duplicate = %pair.duplicate.display(),
                        %fingerprint,
                        "duplicate found"
                    );
                    self.report.duplicates.push(pair);
                }
            }
            Err(error) => {
                debug!(path = %features.path.display(), %error, "excluded from duplicate grouping");
            }
        }

        match &features.sharpness {
            Ok(score) if *score < self.threshold => {
                self.report.low_quality.push(LowQualityEntry::new(
                    features.path.clone(),
                    *score,
                ));
            }
            Ok(_) => {}
            Err(error) => {
                warn!(path = %features.path.display(), %error, "could not analyze image");
                self.report.unreadable.push(UnreadableEntry {
                    file: features.path.clone(),
                    reason: error.to_string(),
                });
            }
        }
    }

    /// Note an entry the walker could not read
    pub fn record_walk_error(&mut self, error: &ScanError) {
        let path = match error {
            ScanError::PermissionDenied { path } | ScanError::ReadEntry { path, .. } => path.clone(),
            _ => self.root.clone(),
        };
        warn!(path = %path.display(), %error, "skipped while walking");
        self.report.walk_errors.push(SkippedEntry {
            path,
            reason: error.to_string(),
        });
    }

    /// Finish aggregation
    pub fn finish(self) -> ScanReport {
        self.report
    }
}
