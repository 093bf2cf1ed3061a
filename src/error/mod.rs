//! # Error Module
//!
//! Typed errors for the image hygiene scanner.
//!
//! ## Propagation
//! - Only root-level problems (missing root, bad configuration, cancellation)
//!   fail a call.
//! - Per-file problems ([`ExtractError`], [`DeletionFailure`]) are recorded in
//!   the report and never abort a scan or a cleanup batch.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum HygieneError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Advice error: {0}")]
    Advice(#[from] AdviceError),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while walking the scan root
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Folder not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Not a folder: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read {path}: {reason}")]
    ReadEntry { path: PathBuf, reason: String },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("Scan was cancelled")]
    Cancelled,
}

/// A single file's features could not be computed.
///
/// Cloneable so one decode failure can be reported for both the
/// fingerprint and the sharpness score.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Failed to open image file {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Image is empty: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Decoder crashed on {path}")]
    Panicked { path: PathBuf },
}

impl ExtractError {
    /// Path of the file that failed
    pub fn path(&self) -> &PathBuf {
        match self {
            ExtractError::Io { path, .. }
            | ExtractError::Decode { path, .. }
            | ExtractError::EmptyImage { path }
            | ExtractError::Panicked { path } => path,
        }
    }
}

/// Why a single duplicate could not be deleted during cleanup
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletionFailure {
    #[error("file no longer exists")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("refusing to delete a path that is also an original")]
    ProtectedOriginal,

    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for DeletionFailure {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => DeletionFailure::NotFound,
            std::io::ErrorKind::PermissionDenied => DeletionFailure::PermissionDenied,
            _ => DeletionFailure::Io(error.to_string()),
        }
    }
}

/// Invalid scanner configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Folder path is empty")]
    EmptyFolderPath,

    #[error("Invalid sharpness threshold: {value} (must be a finite, non-negative number)")]
    InvalidThreshold { value: f64 },

    #[error("Invalid hash size: {value} (must be 4-64)")]
    InvalidHashSize { value: u32 },

    #[error("Worker thread count must be at least 1")]
    InvalidThreadCount,

    #[error("At least one image extension must be configured")]
    NoExtensions,
}

/// Errors from an advisory-text generator
#[derive(Error, Debug)]
pub enum AdviceError {
    #[error("Advice generation failed: {0}")]
    Generation(#[from] std::fmt::Error),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, HygieneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_not_found_includes_path() {
        let error = ScanError::RootNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        assert!(error.to_string().contains("/photos/vacation"));
    }

    #[test]
    fn extract_error_includes_path_and_reason() {
        let error = ExtractError::Decode {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
        assert_eq!(error.path(), &PathBuf::from("/photos/broken.jpg"));
    }

    #[test]
    fn io_errors_map_to_deletion_failures() {
        let not_found = std::io::Error::from(std::io::ErrorKind::NotFound);
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let other = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");

        assert_eq!(DeletionFailure::from(not_found), DeletionFailure::NotFound);
        assert_eq!(DeletionFailure::from(denied), DeletionFailure::PermissionDenied);
        assert_eq!(
            DeletionFailure::from(other),
            DeletionFailure::Io("disk on fire".to_string())
        );
    }

    #[test]
    fn formatting_failure_is_an_advice_error() {
        let error: HygieneError = AdviceError::from(std::fmt::Error).into();
        assert!(matches!(error, HygieneError::Advice(AdviceError::Generation(_))));
        assert!(error.to_string().contains("Advice generation failed"));
    }

    #[test]
    fn scan_error_converts_to_top_level() {
        let error: HygieneError = ScanError::Cancelled.into();
        assert!(matches!(error, HygieneError::Scan(ScanError::Cancelled)));
    }
}
