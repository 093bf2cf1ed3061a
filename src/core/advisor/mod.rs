//! # Advisor Module
//!
//! Turns a [`ScanReport`] into a short, human-readable cleanup plan.
//!
//! Advice is text only; nothing here touches the filesystem. Remote
//! generators (language models and the like) plug in by implementing
//! [`CleanupAdvisor`].

use crate::core::reporter::ScanReport;
use crate::error::AdviceError;
use std::collections::HashSet;
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

/// Produces cleanup advice for a finished scan
pub trait CleanupAdvisor: Send + Sync {
    /// Name shown alongside the advice
    fn name(&self) -> &'static str;

    /// Generate a plan for `report`
    fn advise(&self, report: &ScanReport) -> Result<String, AdviceError>;
}

/// Deterministic advice built from the report alone.
///
/// Lists duplicates to delete, blurry images to review and files that
/// could not be read, each capped at `max_listed` lines.
#[derive(Debug, Clone)]
pub struct RuleBasedAdvisor {
    max_listed: usize,
}

impl RuleBasedAdvisor {
    pub fn new() -> Self {
        Self { max_listed: 10 }
    }

    /// Cap each section at `max` entries
    pub fn with_max_listed(mut self, max: usize) -> Self {
        self.max_listed = max;
        self
    }

    fn section<I>(&self, out: &mut String, title: &str, lines: I, total: usize) -> fmt::Result
    where
        I: Iterator<Item = String>,
    {
        if total == 0 {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(out, "{}:", title)?;
        for line in lines.take(self.max_listed) {
            writeln!(out, "  - {}", line)?;
        }
        if total > self.max_listed {
            writeln!(out, "  ... and {} more", total - self.max_listed)?;
        }
        Ok(())
    }
}

impl Default for RuleBasedAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl CleanupAdvisor for RuleBasedAdvisor {
    fn name(&self) -> &'static str {
        "rule-based"
    }

    fn advise(&self, report: &ScanReport) -> Result<String, AdviceError> {
        let summary = report.summary();
        let mut out = String::new();

        writeln!(
            out,
            "Scanned {} images: {} duplicates, {} low quality.",
            summary.total_images, summary.duplicates_found, summary.low_quality_found
        )?;

        if summary.duplicates_found == 0
            && summary.low_quality_found == 0
            && report.unreadable.is_empty()
        {
            writeln!(out, "Nothing to clean up.")?;
            return Ok(out);
        }

        let deleted: HashSet<&Path> = report
            .deleted_files
            .iter()
            .flatten()
            .map(PathBuf::as_path)
            .collect();
        let pending: Vec<_> = report
            .duplicates
            .iter()
            .filter(|pair| !deleted.contains(pair.duplicate.as_path()))
            .collect();

        self.section(
            &mut out,
            "Delete (exact visual copies, the original is kept)",
            pending.iter().map(|pair| {
                format!(
                    "{} (copy of {})",
                    pair.duplicate.display(),
                    pair.original.display()
                )
            }),
            pending.len(),
        )?;

        self.section(
            &mut out,
            "Review or archive (blurry)",
            report
                .low_quality
                .iter()
                .map(|entry| format!("{} (sharpness {:.2})", entry.file.display(), entry.blur_score)),
            report.low_quality.len(),
        )?;

        self.section(
            &mut out,
            "Check (could not be read)",
            report
                .unreadable
                .iter()
                .map(|entry| format!("{} ({})", entry.file.display(), entry.reason)),
            report.unreadable.len(),
        )?;

        if !deleted.is_empty() {
            writeln!(out)?;
            writeln!(out, "Already deleted: {} files.", deleted.len())?;
        }

        Ok(out)
    }
}
