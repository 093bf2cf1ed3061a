//! Folder-path requests as received from front ends.

use super::Scanner;
use crate::core::cleanup::CleanupExecutor;
use crate::core::reporter::ScanResponse;
use crate::error::{ConfigError, HygieneError};
use crate::events::{null_sender, Event, EventSender, PipelineEvent, PipelinePhase};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// A scan request: a folder path and whether to remove duplicates afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub folder_path: String,
    #[serde(default)]
    pub auto_cleanup: bool,
}

impl ScanRequest {
    pub fn new(folder_path: impl Into<String>, auto_cleanup: bool) -> Self {
        Self {
            folder_path: folder_path.into(),
            auto_cleanup,
        }
    }

    /// The folder to scan, rejecting blank input
    pub fn folder(&self) -> Result<PathBuf, ConfigError> {
        let trimmed = self.folder_path.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyFolderPath);
        }
        Ok(PathBuf::from(trimmed))
    }

    /// Run the request with `scanner`
    pub fn execute(&self, scanner: &Scanner) -> Result<ScanResponse, HygieneError> {
        self.execute_with_events(scanner, &null_sender())
    }

    /// Run the request, reporting progress on `events`.
    ///
    /// Cleanup starts only after the scan has returned, and the response
    /// lists what was actually deleted.
    pub fn execute_with_events(
        &self,
        scanner: &Scanner,
        events: &EventSender,
    ) -> Result<ScanResponse, HygieneError> {
        let folder = self.folder()?;
        let mut report = scanner.run_with_events(&folder, events)?;

        if self.auto_cleanup {
            warn!(
                targets = report.duplicates.len(),
                "auto-cleanup enabled, duplicates will be permanently deleted"
            );
            events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Cleanup,
            }));
            let outcome = CleanupExecutor::new().execute_with_events(&report.duplicates, events);
            report.apply_cleanup(&outcome);
        }

        Ok(ScanResponse::from(report))
    }
}
