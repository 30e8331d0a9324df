//! Shared file records owned by the build graph.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use weft_target::TargetKind;

use crate::{GraphError, Result};

/// Result of resolving a raw usage reference against the module graph.
#[derive(Debug, Clone)]
pub struct ResolvedRef {
    /// Identifier the descriptor rewrite emits for this reference.
    pub module_id: String,
    /// On-disk file backing the resolved module, when it has one.
    pub file: Option<PathBuf>,
}

/// A file known to the build graph.
///
/// Records are `Arc`-shared between the graph and the component engine.
/// Identity is the full path; everything else is classification and
/// analysis state. Flags only ever transition towards `true` during a
/// build run, so they are plain atomics rather than locked fields.
#[derive(Debug)]
pub struct FileRecord {
    full_path: PathBuf,
    dir: PathBuf,
    base_name: String,
    extension: String,
    is_json: bool,
    content: RwLock<Option<Arc<Vec<u8>>>>,
    // script <-> descriptor association, written only through the graph
    component: OnceLock<Weak<FileRecord>>,
    descriptor: OnceLock<Weak<FileRecord>>,
    is_component_config: AtomicBool,
    is_analysed_components: AtomicBool,
    native_flags: AtomicU8,
    resolved_refs: RwLock<FxHashMap<String, ResolvedRef>>,
}

fn native_bit(target: TargetKind) -> u8 {
    match target {
        TargetKind::Wx => 1 << 0,
        TargetKind::Swan => 1 << 1,
        TargetKind::Ant => 1 << 2,
        TargetKind::Tt => 1 << 3,
        // quick app has no native component dialect
        TargetKind::Quick => 0,
    }
}

impl FileRecord {
    /// Create a record for `path`, classifying it by extension.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidPath`] when the path has no parent
    /// directory or no UTF-8 file stem.
    pub fn new(path: &Path) -> Result<Self> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| GraphError::InvalidPath(path.to_path_buf()))?
            .to_path_buf();
        let base_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| GraphError::InvalidPath(path.to_path_buf()))?
            .to_string();
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let is_json = matches!(extension.as_str(), "json" | "json5");

        Ok(Self {
            full_path: path.to_path_buf(),
            dir,
            base_name,
            extension,
            is_json,
            content: RwLock::new(None),
            component: OnceLock::new(),
            descriptor: OnceLock::new(),
            is_component_config: AtomicBool::new(false),
            is_analysed_components: AtomicBool::new(false),
            native_flags: AtomicU8::new(0),
            resolved_refs: RwLock::new(FxHashMap::default()),
        })
    }

    /// Full path, the record's identity.
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Directory containing the file.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name without its extension.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// File extension, empty when the file has none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Classifier flag: the file parses as JSON configuration.
    pub fn is_json(&self) -> bool {
        self.is_json
    }

    /// Install virtual content, bypassing the filesystem.
    pub fn set_content(&self, bytes: impl Into<Vec<u8>>) {
        *self.content.write() = Some(Arc::new(bytes.into()));
    }

    /// Return the file's content, reading and caching it from disk on the
    /// first call unless virtual content was installed.
    ///
    /// # Errors
    ///
    /// Propagates the read error when the file cannot be loaded.
    pub fn load_content(&self) -> Result<Arc<Vec<u8>>> {
        if let Some(content) = self.content.read().as_ref() {
            return Ok(content.clone());
        }
        let bytes = Arc::new(std::fs::read(&self.full_path)?);
        *self.content.write() = Some(bytes.clone());
        Ok(bytes)
    }

    /// Mark this file as a component descriptor. Monotonic.
    pub fn mark_component_config(&self) {
        self.is_component_config.store(true, Ordering::Release);
    }

    /// Whether this file was recognized as a component descriptor.
    pub fn is_component_config(&self) -> bool {
        self.is_component_config.load(Ordering::Acquire)
    }

    /// Atomically claim the one-shot component analysis for this script.
    ///
    /// Returns `true` exactly once; later calls (including re-entrant ones
    /// from usage-graph cycles) observe the claim and return `false`.
    pub fn claim_analysis(&self) -> bool {
        !self.is_analysed_components.swap(true, Ordering::AcqRel)
    }

    /// Whether component analysis ran (or was claimed) for this script.
    pub fn is_analysed(&self) -> bool {
        self.is_analysed_components.load(Ordering::Acquire)
    }

    /// Flag this script as backing a native component for `target`. Monotonic.
    pub fn mark_native(&self, target: TargetKind) {
        let bit = native_bit(target);
        if bit != 0 {
            self.native_flags.fetch_or(bit, Ordering::AcqRel);
        }
    }

    /// Whether a native sibling for `target` was discovered for this script.
    pub fn has_native(&self, target: TargetKind) -> bool {
        let bit = native_bit(target);
        bit != 0 && self.native_flags.load(Ordering::Acquire) & bit != 0
    }

    /// The script owning this descriptor, when the association is set.
    pub fn component(&self) -> Option<Arc<FileRecord>> {
        self.component.get().and_then(Weak::upgrade)
    }

    /// The descriptor bound to this script, when the association is set.
    pub fn descriptor(&self) -> Option<Arc<FileRecord>> {
        self.descriptor.get().and_then(Weak::upgrade)
    }

    /// Record the resolution of a raw usage reference.
    pub fn record_resolution(&self, reference: &str, resolved: ResolvedRef) {
        self.resolved_refs
            .write()
            .insert(reference.to_string(), resolved);
    }

    /// Resolution previously recorded for a raw usage reference.
    pub fn resolution(&self, reference: &str) -> Option<ResolvedRef> {
        self.resolved_refs.read().get(reference).cloned()
    }

    /// Bind `descriptor` to the `script` that owns it, both directions.
    ///
    /// First bind wins; a second script claiming the same descriptor is
    /// rejected with a warning so the association never flips mid-run.
    pub(crate) fn bind(descriptor: &Arc<FileRecord>, script: &Arc<FileRecord>) {
        if descriptor.component.set(Arc::downgrade(script)).is_err() {
            tracing::warn!(
                descriptor = %descriptor.full_path.display(),
                script = %script.full_path.display(),
                "descriptor is already bound to a component script"
            );
            return;
        }
        let _ = script.descriptor.set(Arc::downgrade(descriptor));
    }
}
