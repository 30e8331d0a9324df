//! Typed options the embedding pipeline hands to the component engine.

use std::path::{Path, PathBuf};

use weft_target::TargetKind;

/// Options identifying the active build target and the canonical source
/// tree root.
///
/// Files under the source root are addressed through the build graph by
/// identity; files outside it (external modules) are discovered through
/// directory scans. Configuration *loading* is the orchestrator's concern;
/// the engine only consumes the typed result.
#[derive(Debug, Clone)]
pub struct ComponentOptions {
    target: TargetKind,
    source_dir: PathBuf,
}

impl ComponentOptions {
    /// Create options for `target` with the given source-tree root.
    pub fn new(target: TargetKind, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            target,
            source_dir: source_dir.into(),
        }
    }

    /// The active build target.
    pub fn target(&self) -> TargetKind {
        self.target
    }

    /// The canonical source-tree root.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Whether `path` lies inside the canonical source tree.
    pub fn is_in_source_dir(&self, path: &Path) -> bool {
        path.starts_with(&self.source_dir)
    }
}
