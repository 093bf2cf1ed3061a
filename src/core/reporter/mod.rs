//! # Reporter Module
//!
//! The structured result of a scan.
//!
//! [`ScanReport`] holds everything found; [`ScanSummary`] is the four-number
//! digest shown to users; [`ScanResponse`] pairs them in the JSON shape web
//! front ends consume (`{"summary": {...}, "details": {...}}`).

mod builder;
pub(crate) mod lossy;

pub use builder::ReportBuilder;

use crate::core::cleanup::CleanupOutcome;
use crate::core::comparator::DuplicatePair;
use crate::error::DeletionFailure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// An image whose sharpness fell below the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowQualityEntry {
    /// The blurry image
    #[serde(serialize_with = "lossy::path")]
    pub file: PathBuf,
    /// Laplacian variance, rounded to two decimals
    pub blur_score: f64,
}

impl LowQualityEntry {
    /// Entry with the score rounded to two decimals
    pub fn new(file: PathBuf, score: f64) -> Self {
        Self {
            file,
            blur_score: (score * 100.0).round() / 100.0,
        }
    }
}

/// An image that could not be decoded, so has no sharpness score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadableEntry {
    #[serde(serialize_with = "lossy::path")]
    pub file: PathBuf,
    pub reason: String,
}

/// A directory entry the walker could not read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    #[serde(serialize_with = "lossy::path")]
    pub path: PathBuf,
    pub reason: String,
}

/// Complete result of scanning one folder tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Folder that was scanned
    #[serde(serialize_with = "lossy::path")]
    pub root: PathBuf,
    /// Files whose extension matched, decodable or not
    pub total_images: usize,
    /// Duplicate pairs in canonical walk order
    pub duplicates: Vec<DuplicatePair>,
    /// Images below the sharpness threshold, in walk order
    pub low_quality: Vec<LowQualityEntry>,
    /// Images that could not be decoded
    #[serde(default)]
    pub unreadable: Vec<UnreadableEntry>,
    /// Entries skipped by the walker
    #[serde(default)]
    pub walk_errors: Vec<SkippedEntry>,
    /// Duplicates actually removed; absent unless cleanup ran
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "lossy::optional_paths"
    )]
    pub deleted_files: Option<Vec<PathBuf>>,
    /// Duplicates cleanup could not remove, with the reason
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        serialize_with = "lossy::path_keys"
    )]
    pub deletion_failures: BTreeMap<PathBuf, DeletionFailure>,
}

impl ScanReport {
    /// A report with nothing found yet
    pub fn empty(root: PathBuf) -> Self {
        Self {
            root,
            total_images: 0,
            duplicates: Vec::new(),
            low_quality: Vec::new(),
            unreadable: Vec::new(),
            walk_errors: Vec::new(),
            deleted_files: None,
            deletion_failures: BTreeMap::new(),
        }
    }

    /// Record what a cleanup run actually did
    pub fn apply_cleanup(&mut self, outcome: &CleanupOutcome) {
        self.deleted_files = Some(outcome.deleted.clone());
        self.deletion_failures = outcome.failures.clone();
    }

    /// Four-number digest
    pub fn summary(&self) -> ScanSummary {
        ScanSummary::from(self)
    }
}

/// Counts shown to users after a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_images: usize,
    pub duplicates_found: usize,
    pub low_quality_found: usize,
    /// Files removed by cleanup (0 when cleanup did not run)
    pub deleted_files: usize,
}

impl From<&ScanReport> for ScanSummary {
    fn from(report: &ScanReport) -> Self {
        Self {
            total_images: report.total_images,
            duplicates_found: report.duplicates.len(),
            low_quality_found: report.low_quality.len(),
            deleted_files: report.deleted_files.as_ref().map_or(0, Vec::len),
        }
    }
}

/// Summary plus full details, as served to front ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub summary: ScanSummary,
    pub details: ScanReport,
}

impl From<ScanReport> for ScanResponse {
    fn from(report: ScanReport) -> Self {
        Self {
            summary: report.summary(),
            details: report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ScanReport {
        let mut report = ScanReport::empty(PathBuf::from("/photos"));
        report.total_images = 3;
        report.duplicates.push(DuplicatePair {
            original: PathBuf::from("/photos/a.jpg"),
            duplicate: PathBuf::from("/photos/b.jpg"),
        });
        report
            .low_quality
            .push(LowQualityEntry::new(PathBuf::from("/photos/c.jpg"), 40.0));
        report
    }

    #[test]
    fn blur_score_is_rounded_to_two_decimals() {
        let entry = LowQualityEntry::new(PathBuf::from("x.jpg"), 12.34567);
        assert_eq!(entry.blur_score, 12.35);
    }

    #[test]
    fn summary_counts() {
        let summary = sample_report().summary();
        assert_eq!(
            summary,
            ScanSummary {
                total_images: 3,
                duplicates_found: 1,
                low_quality_found: 1,
                deleted_files: 0,
            }
        );
    }

    #[test]
    fn deleted_files_only_serialized_after_cleanup() {
        let mut report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("deleted_files"));

        report.apply_cleanup(&CleanupOutcome {
            deleted: vec![PathBuf::from("/photos/b.jpg")],
            failures: BTreeMap::new(),
        });
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("deleted_files"));
        assert_eq!(report.summary().deleted_files, 1);
    }

    #[test]
    fn response_json_shape() {
        let response = ScanResponse::from(sample_report());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["summary"]["total_images"], 3);
        assert_eq!(value["summary"]["duplicates_found"], 1);
        assert_eq!(value["details"]["duplicates"][0]["original"], "/photos/a.jpg");
        assert_eq!(value["details"]["low_quality"][0]["blur_score"], 40.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_do_not_break_serialization() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let odd = PathBuf::from(OsStr::from_bytes(b"/photos/b\xff.jpg"));
        let mut report = sample_report();
        report.duplicates[0].duplicate = odd.clone();
        report.apply_cleanup(&CleanupOutcome {
            deleted: vec![odd.clone()],
            failures: BTreeMap::from([(odd, DeletionFailure::NotFound)]),
        });

        let value = serde_json::to_value(ScanResponse::from(report)).unwrap();

        assert_eq!(value["details"]["duplicates"][0]["duplicate"], "/photos/b\u{FFFD}.jpg");
        assert_eq!(value["details"]["deleted_files"][0], "/photos/b\u{FFFD}.jpg");
        assert!(value["details"]["deletion_failures"]
            .get("/photos/b\u{FFFD}.jpg")
            .is_some());
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let restored: ScanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, report);
    }
}
