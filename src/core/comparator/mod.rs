//! # Comparator Module
//!
//! Finds duplicates by exact fingerprint match.
//!
//! There is no similarity threshold: two images whose fingerprints differ by
//! a single bit are unrelated. The pHash fingerprint already absorbs minor
//! recompression and resizing.

mod grouper;

pub use grouper::DuplicateGrouper;

use crate::core::reporter::lossy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A later image whose fingerprint matches an earlier one.
///
/// Which file is the original depends only on canonical walk order, never on
/// timestamps, size or quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatePair {
    /// First image with this fingerprint
    #[serde(serialize_with = "lossy::path")]
    pub original: PathBuf,
    /// Later image with the same fingerprint
    #[serde(serialize_with = "lossy::path")]
    pub duplicate: PathBuf,
}
