//! Lazy directory walking using walkdir.

use super::filter::{is_hidden, ImageFilter};
use super::{resolved_location, WalkItem};
use crate::error::ScanError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Configuration for the tree walk
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
            max_depth: None,
            extensions: None,
        }
    }
}

/// Yields every candidate image under a root, in canonical order.
///
/// Canonical order is depth-first with each directory's entries sorted by
/// file name, so the same tree produces the same sequence on every platform.
/// Unreadable entries are yielded as `Err` and the walk continues.
///
/// Symlinks to image files are candidates in either mode. When symlinked
/// folders are followed, a file reached through more than one folder path is
/// yielded once, under the first path seen.
pub struct ImageWalker {
    root: PathBuf,
    entries: Box<dyn Iterator<Item = walkdir::Result<DirEntry>>>,
    filter: ImageFilter,
    /// Locations already yielded; only tracked when following links
    seen: Option<HashSet<PathBuf>>,
}

impl ImageWalker {
    /// Prepare a walk of `root`.
    ///
    /// Fails before touching any entry if the root is missing or is not a
    /// directory.
    pub fn new(root: impl AsRef<Path>, config: &WalkConfig) -> Result<Self, ScanError> {
        let root = root.as_ref();

        if !root.exists() {
            return Err(ScanError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut filter = ImageFilter::new().with_hidden(config.include_hidden);
        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions);
        }

        let mut walker = WalkDir::new(root)
            .follow_links(config.follow_symlinks)
            .sort_by_file_name();
        if let Some(depth) = config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = config.include_hidden;
        let entries = walker.into_iter().filter_entry(move |entry| {
            include_hidden || entry.depth() == 0 || !is_hidden(entry.path())
        });

        Ok(Self {
            root: root.to_path_buf(),
            entries: Box::new(entries),
            filter,
            seen: config.follow_symlinks.then(HashSet::new),
        })
    }

    /// The directory being walked
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn already_seen(&mut self, path: &Path) -> bool {
        let Some(seen) = self.seen.as_mut() else {
            return false;
        };
        match resolved_location(path) {
            Ok(location) => !seen.insert(location),
            Err(_) => false,
        }
    }

    fn convert_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        if error.io_error().map(|e| e.kind()) == Some(std::io::ErrorKind::PermissionDenied) {
            ScanError::PermissionDenied { path }
        } else {
            ScanError::ReadEntry {
                path,
                reason: error.to_string(),
            }
        }
    }
}

/// A regular file, or a symlink whose target is one
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file()
        || (file_type.is_symlink()
            && fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false))
}

impl Iterator for ImageWalker {
    type Item = WalkItem;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.entries.next()? {
                Ok(entry) => {
                    if !is_regular_file(&entry) || !self.filter.should_include(entry.path()) {
                        continue;
                    }
                    if self.already_seen(entry.path()) {
                        continue;
                    }
                    return Some(Ok(entry.into_path()));
                }
                Err(error) => return Some(Err(self.convert_error(error))),
            }
        }
    }
}
