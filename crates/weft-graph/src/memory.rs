//! In-memory reference implementation of the build graph.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use path_clean::PathClean;
use rustc_hash::FxHashMap;

use crate::file::{FileRecord, ResolvedRef};
use crate::graph::BuildGraph;
use crate::Result;

/// Extensions probed, in order, when a usage reference omits one.
const SCRIPT_EXTENSIONS: [&str; 2] = ["js", "ts"];

/// HashMap-backed build graph.
///
/// Suitable for tests and for embedders without their own graph. Files are
/// registered on demand; the resolver is deterministic and purely
/// path-based:
///
/// - `./x` and `../x` resolve against the importing script's directory,
/// - `/x` resolves against the source root,
/// - bare specifiers resolve against the source root,
///
/// and the joined path is normalized before probing the registry, then the
/// filesystem, for the reference verbatim and the known script extensions.
#[derive(Debug)]
pub struct MemoryGraph {
    source_dir: PathBuf,
    inner: RwLock<GraphInner>,
}

#[derive(Debug, Default)]
struct GraphInner {
    files: FxHashMap<PathBuf, Arc<FileRecord>>,
}

impl MemoryGraph {
    /// Create a graph rooted at `source_dir`.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            inner: RwLock::new(GraphInner::default()),
        }
    }

    /// The canonical source-tree root.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Number of registered files.
    pub fn file_count(&self) -> usize {
        self.inner.read().files.len()
    }

    /// Module identifier for a resolved file: the path minus its extension,
    /// root-relative with a leading `/` when under the source root.
    fn module_id_for(&self, file: &Path) -> String {
        let stem = file.with_extension("");
        match stem.strip_prefix(&self.source_dir) {
            Ok(rel) => format!("/{}", rel.display()),
            Err(_) => stem.display().to_string(),
        }
    }

    /// Find the script file a normalized reference points at, checking the
    /// registry before the filesystem.
    fn probe_script(&self, base: &Path) -> Option<PathBuf> {
        let mut candidates = Vec::with_capacity(SCRIPT_EXTENSIONS.len() + 1);
        if base.extension().is_some() {
            candidates.push(base.to_path_buf());
        }
        for ext in SCRIPT_EXTENSIONS {
            candidates.push(base.with_extension(ext));
        }

        {
            let inner = self.inner.read();
            if let Some(hit) = candidates.iter().find(|c| inner.files.contains_key(*c)) {
                return Some(hit.clone());
            }
        }
        candidates.into_iter().find(|c| c.is_file())
    }
}

impl BuildGraph for MemoryGraph {
    fn register_file(&self, path: &Path) -> Result<Arc<FileRecord>> {
        if let Some(existing) = self.file_by_path(path) {
            return Ok(existing);
        }
        let record = Arc::new(FileRecord::new(path)?);
        tracing::debug!(path = %path.display(), "registered file");
        let mut inner = self.inner.write();
        let entry = inner
            .files
            .entry(record.full_path().to_path_buf())
            .or_insert(record);
        Ok(entry.clone())
    }

    fn file_by_path(&self, path: &Path) -> Option<Arc<FileRecord>> {
        self.inner.read().files.get(path).cloned()
    }

    fn resolve_dependency(&self, script: &Arc<FileRecord>, reference: &str) -> Option<String> {
        if reference.is_empty() {
            return None;
        }

        let joined = if let Some(rest) = reference.strip_prefix('/') {
            self.source_dir.join(rest)
        } else if reference.starts_with("./") || reference.starts_with("../") {
            script.dir().join(reference)
        } else {
            self.source_dir.join(reference)
        };

        let file = self.probe_script(&joined.clean())?;
        let record = self.register_file(&file).ok()?;
        let module_id = self.module_id_for(record.full_path());
        script.record_resolution(
            reference,
            ResolvedRef {
                module_id: module_id.clone(),
                file: Some(record.full_path().to_path_buf()),
            },
        );
        tracing::debug!(
            script = %script.full_path().display(),
            reference = %reference,
            module_id = %module_id,
            "resolved component usage"
        );
        Some(module_id)
    }
}
