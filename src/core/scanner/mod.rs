//! # Scanner Module
//!
//! Finds candidate images under a scan root.
//!
//! ## Supported Formats
//! - JPEG (.jpg, .jpeg)
//! - PNG (.png)
//! - BMP (.bmp)
//! - WebP (.webp)
//!
//! Matching is on the lowercased extension only; content is not inspected
//! here. A `.jpg` that fails to decode is still a candidate and still counts.
//!
//! ## Example
//! ```rust,ignore
//! use image_hygiene::core::scanner::{ImageWalker, WalkConfig};
//!
//! for item in ImageWalker::new("/Users/me/Pictures", &WalkConfig::default())? {
//!     match item {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("skipped: {e}"),
//!     }
//! }
//! ```

mod filter;
mod walker;

pub use filter::{ImageFilter, DEFAULT_EXTENSIONS};
pub use walker::{ImageWalker, WalkConfig};

use crate::error::ScanError;
use std::io;
use std::path::{Path, PathBuf};

/// One step of a walk: a candidate image, or an entry that could not be read
pub type WalkItem = Result<PathBuf, ScanError>;

/// The directory entry `path` names, with every symlinked folder above it
/// resolved.
///
/// The final component is kept as is: a symlinked file has its own
/// location, distinct from its target. Two paths with the same location
/// are the same directory entry, so unlinking one unlinks the other.
pub fn resolved_location(path: &Path) -> io::Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(parent.canonicalize()?.join(name))
}
