//! Lazily built, cached per-directory file index.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHashMap;

use crate::Result;

/// Files of one directory grouped by base name (extension stripped), each
/// group in directory-encounter order.
pub type DirListing = FxHashMap<String, Vec<PathBuf>>;

/// Cache of directory listings, built once per directory and kept for the
/// lifetime of the owning processor (one build run).
///
/// Directories are assumed immutable during a run: an entry is never
/// re-scanned or invalidated. The cache is an owned value handed around by
/// reference, not process-global state.
#[derive(Debug, Default)]
pub struct DirIndex {
    dirs: DashMap<PathBuf, Arc<DirListing>>,
}

impl DirIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of directories scanned so far.
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Whether no directory has been scanned yet.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// The grouped file listing of `dir`, scanning it on first access.
    ///
    /// # Errors
    ///
    /// Propagates the I/O error when the directory cannot be listed. There
    /// is no empty-result fallback: a missing directory is the caller's
    /// fault to handle.
    pub fn files(&self, dir: &Path) -> Result<Arc<DirListing>> {
        if let Some(listing) = self.dirs.get(dir) {
            return Ok(listing.clone());
        }
        let listing = Arc::new(scan_dir(dir)?);
        tracing::debug!(dir = %dir.display(), groups = listing.len(), "indexed directory");
        let entry = self.dirs.entry(dir.to_path_buf()).or_insert(listing);
        Ok(entry.value().clone())
    }
}

/// List `dir` and group its regular files by base name. Entries that fail
/// to stat, directories, and non-UTF-8 names are skipped.
fn scan_dir(dir: &Path) -> Result<DirListing> {
    let mut groups = DirListing::default();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Ok(metadata) = fs::metadata(&path) else {
            continue;
        };
        if metadata.is_dir() {
            continue;
        }
        let Some(base) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        groups.entry(base.to_string()).or_default().push(path);
    }
    Ok(groups)
}
