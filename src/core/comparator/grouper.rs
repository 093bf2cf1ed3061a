//! First-seen-wins grouping by exact fingerprint.

use super::DuplicatePair;
use crate::core::hasher::Fingerprint;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Maps each fingerprint to the first path that produced it.
///
/// Owned by a single scan. Feed it paths in canonical order; the first path
/// seen for a fingerprint becomes the original of every later match, so a
/// chain of three identical images yields two pairs sharing one original.
#[derive(Debug, Default)]
pub struct DuplicateGrouper {
    first_seen: HashMap<Fingerprint, PathBuf>,
}

impl DuplicateGrouper {
    /// Create an empty grouper
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` and return a pair if its fingerprint was already seen.
    pub fn observe(&mut self, path: &Path, fingerprint: &Fingerprint) -> Option<DuplicatePair> {
        match self.first_seen.get(fingerprint) {
            Some(original) => Some(DuplicatePair {
                original: original.clone(),
                duplicate: path.to_path_buf(),
            }),
            None => {
                self.first_seen
                    .insert(fingerprint.clone(), path.to_path_buf());
                None
            }
        }
    }

    /// Number of distinct fingerprints seen
    pub fn distinct(&self) -> usize {
        self.first_seen.len()
    }
}
