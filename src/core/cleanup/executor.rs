//! Best-effort deletion of duplicate images.

use super::CleanupOutcome;
use crate::core::comparator::DuplicatePair;
use crate::core::scanner::resolved_location;
use crate::error::DeletionFailure;
use crate::events::{null_sender, CleanupEvent, Event, EventSender};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Permanently deletes the `duplicate` side of duplicate pairs.
///
/// **Destructive and non-transactional.** Files are unlinked with
/// [`fs::remove_file`]; nothing is moved to a trash folder or backed up, and
/// nothing is rolled back when a sibling deletion fails. Every target is
/// attempted independently and the outcome records exactly what happened.
#[derive(Debug, Clone, Default)]
pub struct CleanupExecutor {
    sequential: bool,
}

impl CleanupExecutor {
    /// Executor that deletes on the rayon pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete one file at a time on the calling thread
    pub fn sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    /// Delete every duplicate in `pairs`.
    pub fn execute(&self, pairs: &[DuplicatePair]) -> CleanupOutcome {
        self.execute_with_events(pairs, &null_sender())
    }

    /// Delete every duplicate in `pairs`, reporting each outcome.
    pub fn execute_with_events(
        &self,
        pairs: &[DuplicatePair],
        events: &EventSender,
    ) -> CleanupOutcome {
        let originals = ProtectedSet::new(pairs);
        let targets = unique_targets(pairs);

        events.send(Event::Cleanup(CleanupEvent::Started {
            targets: targets.len(),
        }));

        let attempt = |target: &PathBuf| -> (PathBuf, Result<(), DeletionFailure>) {
            let result = if originals.protects(target) {
                Err(DeletionFailure::ProtectedOriginal)
            } else {
                delete_file(target)
            };

            match &result {
                Ok(()) => {
                    info!(path = %target.display(), "deleted duplicate");
                    events.send(Event::Cleanup(CleanupEvent::Deleted {
                        path: target.clone(),
                    }));
                }
                Err(failure) => {
                    warn!(path = %target.display(), %failure, "could not delete duplicate");
                    events.send(Event::Cleanup(CleanupEvent::Failed {
                        path: target.clone(),
                        message: failure.to_string(),
                    }));
                }
            }

            (target.clone(), result)
        };

        // Ordered collect keeps `deleted` in pair order either way.
        let attempts: Vec<_> = if self.sequential {
            targets.iter().map(attempt).collect()
        } else {
            targets.par_iter().map(attempt).collect()
        };

        let mut outcome = CleanupOutcome::default();
        for (path, result) in attempts {
            match result {
                Ok(()) => outcome.deleted.push(path),
                Err(failure) => {
                    outcome.failures.insert(path, failure);
                }
            }
        }

        events.send(Event::Cleanup(CleanupEvent::Completed {
            deleted: outcome.deleted.len(),
            failed: outcome.failures.len(),
        }));

        outcome
    }
}

/// Every `original` path, both as written and as a resolved location.
///
/// The resolved form catches a duplicate path that reaches an original
/// through a symlinked folder: unlinking it would unlink the original.
struct ProtectedSet<'a> {
    paths: HashSet<&'a Path>,
    locations: HashSet<PathBuf>,
}

impl<'a> ProtectedSet<'a> {
    fn new(pairs: &'a [DuplicatePair]) -> Self {
        let paths: HashSet<&Path> = pairs.iter().map(|p| p.original.as_path()).collect();
        let locations = paths
            .iter()
            .filter_map(|path| resolved_location(path).ok())
            .collect();
        Self { paths, locations }
    }

    fn protects(&self, target: &Path) -> bool {
        self.paths.contains(target)
            || resolved_location(target)
                .map(|location| self.locations.contains(&location))
                .unwrap_or(false)
    }
}

/// Duplicate paths in first-mention order, each once
fn unique_targets(pairs: &[DuplicatePair]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    pairs
        .iter()
        .filter(|pair| seen.insert(pair.duplicate.as_path()))
        .map(|pair| pair.duplicate.clone())
        .collect()
}

fn delete_file(path: &Path) -> Result<(), DeletionFailure> {
    // The file may have vanished since the scan.
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        return Err(DeletionFailure::Io("path is a directory".to_string()));
    }
    fs::remove_file(path)?;
    Ok(())
}
