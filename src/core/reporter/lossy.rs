//! Path serializers that never fail.
//!
//! `PathBuf`'s own `Serialize` errors on names that are not valid UTF-8,
//! which would throw away a whole report over one file name. These write
//! such names with U+FFFD in place of the bad bytes.

use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub fn path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

pub fn paths<S: Serializer>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(paths.iter().map(|p| p.to_string_lossy()))
}

pub fn optional_paths<S: Serializer>(
    paths: &Option<Vec<PathBuf>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match paths {
        Some(paths) => serializer.serialize_some(&LossyPaths(paths)),
        None => serializer.serialize_none(),
    }
}

pub fn path_keys<S, V>(map: &BTreeMap<PathBuf, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_map(map.iter().map(|(path, value)| (path.to_string_lossy(), value)))
}

struct LossyPaths<'a>(&'a [PathBuf]);

impl Serialize for LossyPaths<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        paths(self.0, serializer)
    }
}
