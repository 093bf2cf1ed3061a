//! # Image Hygiene
//!
//! Finds duplicate and blurry images in a folder tree, and optionally removes
//! the duplicates.
//!
//! ## Core Philosophy
//! - **Scanning is read-only** - A scan never modifies the filesystem
//! - **Deletion is explicit** - Only [`cleanup`] or an auto-cleanup request
//!   removes files, and only `duplicate` paths
//! - **Partial failure is data** - Unreadable files and failed deletions are
//!   listed in the report, never fatal
//!
//! ## Architecture
//! - `core` - The scanning engine
//! - `events` - Event-driven progress reporting
//! - `error` - Typed error taxonomy
//!
//! ## Example
//! ```no_run
//! let report = image_hygiene::scan("/home/me/Pictures")?;
//! for pair in &report.duplicates {
//!     println!("{} duplicates {}", pair.duplicate.display(), pair.original.display());
//! }
//! # Ok::<(), image_hygiene::HygieneError>(())
//! ```

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use crate::core::{cleanup, scan, CleanupOutcome, DuplicatePair, ScanReport, ScanResponse};
pub use error::{HygieneError, Result};

/// Initialize tracing for the application.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies. Logs go to
/// stderr so JSON output on stdout stays clean. Calling it twice is harmless.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
