//! # Pipeline Module
//!
//! Orchestrates a full scan.
//!
//! ## Pipeline Stages
//! 1. **Walk** - Discover images under the root in canonical order
//! 2. **Extract** - Decode once, fingerprint and score sharpness
//! 3. **Aggregate** - Group duplicates and flag blurry images
//! 4. **Cleanup** - Optional, only through [`ScanRequest`] with `auto_cleanup`
//!
//! ## Parallelism
//! Extraction runs on a bounded rayon pool; aggregation stays on the calling
//! thread so results do not depend on scheduling.

mod executor;
mod request;

pub use executor::{scan, CancellationToken, ScanConfig, Scanner, ScannerBuilder};
pub use request::ScanRequest;
