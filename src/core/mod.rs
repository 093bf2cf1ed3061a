//! # Core Module
//!
//! The front-end-agnostic image hygiene engine.
//!
//! ## Modules
//! - `scanner` - Discovers images under a folder in canonical order
//! - `hasher` - Decodes images and computes perceptual fingerprints
//! - `quality` - Scores sharpness with the variance of the Laplacian
//! - `extractor` - Derives both signals from one decode
//! - `comparator` - Groups exact fingerprint matches into duplicate pairs
//! - `reporter` - The scan report and its summary
//! - `cleanup` - Permanently deletes duplicates on request
//! - `pipeline` - Orchestrates the full workflow
//! - `advisor` - Turns a report into a cleanup plan

pub mod advisor;
pub mod cleanup;
pub mod comparator;
pub mod extractor;
pub mod hasher;
pub mod pipeline;
pub mod quality;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use advisor::{CleanupAdvisor, RuleBasedAdvisor};
pub use cleanup::{cleanup, CleanupExecutor, CleanupOutcome};
pub use comparator::DuplicatePair;
pub use hasher::{Fingerprint, FingerprintAlgorithm};
pub use pipeline::{scan, CancellationToken, ScanRequest, Scanner};
pub use reporter::{LowQualityEntry, ScanReport, ScanResponse, ScanSummary};
