//! # Cleanup Module
//!
//! Optional removal of detected duplicates.
//!
//! ## Safety Contract
//! - Only `duplicate` paths are ever targeted; a path that appears as an
//!   `original` anywhere in the input is refused.
//! - Deletion is **permanent**. There is no trash folder and no backup.
//! - Each file succeeds or fails on its own. One failure never stops the
//!   batch, and the outcome lists exactly which files were removed.
//! - Run it only after the scan that produced the pairs has returned.

mod executor;

pub use executor::CleanupExecutor;

use crate::core::reporter::{lossy, ScanReport};
use crate::error::DeletionFailure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What a cleanup run actually did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupOutcome {
    /// Files removed, in duplicate-pair order
    #[serde(serialize_with = "lossy::paths")]
    pub deleted: Vec<PathBuf>,
    /// Files that could not be removed
    #[serde(serialize_with = "lossy::path_keys")]
    pub failures: BTreeMap<PathBuf, DeletionFailure>,
}

/// Permanently delete every duplicate listed in `report`.
///
/// This is destructive and cannot be undone. See [`CleanupExecutor`].
pub fn cleanup(report: &ScanReport) -> CleanupOutcome {
    CleanupExecutor::new().execute(&report.duplicates)
}
