//! Event type definitions for progress reporting.

use crate::core::reporter::ScanSummary;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted while scanning and cleaning a folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Tree walk events
    Scan(ScanEvent),
    /// Feature extraction events
    Extract(ExtractEvent),
    /// Duplicate deletion events
    Cleanup(CleanupEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the tree walk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Walking has started
    Started { root: PathBuf },
    /// A file with a supported extension was found
    ImageFound { path: PathBuf },
    /// An entry could not be read but walking continues
    Error { path: PathBuf, message: String },
    /// Walking completed
    Completed { total_images: usize },
}

/// Events during feature extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExtractEvent {
    /// Extraction has started
    Started { total_images: usize },
    /// Progress update
    Progress(ExtractProgress),
    /// A file could not be decoded but extraction continues
    Failed { path: PathBuf, message: String },
    /// Extraction completed
    Completed { extracted: usize, failed: usize },
}

/// Progress information during feature extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractProgress {
    /// Number of images processed so far
    pub completed: usize,
    /// Total number of images to process
    pub total: usize,
    /// Image that just finished
    pub current_path: PathBuf,
}

/// Events during duplicate cleanup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CleanupEvent {
    /// Cleanup has started
    Started { targets: usize },
    /// A duplicate was permanently deleted
    Deleted { path: PathBuf },
    /// A duplicate could not be deleted
    Failed { path: PathBuf, message: String },
    /// Cleanup completed
    Completed { deleted: usize, failed: usize },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Scan completed successfully
    Completed { summary: ScanSummary },
    /// Scan was cancelled
    Cancelled,
    /// Scan failed before producing a report
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Walking,
    Extracting,
    Aggregating,
    Cleanup,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Walking => write!(f, "Walking"),
            PipelinePhase::Extracting => write!(f, "Extracting"),
            PipelinePhase::Aggregating => write!(f, "Aggregating"),
            PipelinePhase::Cleanup => write!(f, "Cleaning up"),
        }
    }
}
