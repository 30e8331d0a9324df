//! The seam between the component engine and its hosting build graph.

use std::path::Path;
use std::sync::Arc;

use crate::file::FileRecord;
use crate::Result;

/// Operations the component engine consumes from the hosting build graph.
///
/// The engine never owns files or implements module resolution: it registers
/// discovered siblings, looks records up by path, and asks the graph to
/// resolve usage references. A pipeline embedding the engine implements this
/// trait over its own storage; [`crate::MemoryGraph`] is the reference
/// implementation.
pub trait BuildGraph: Send + Sync + std::fmt::Debug {
    /// Register a file, returning the existing record when already present.
    ///
    /// Registration classifies the file (extension, JSON flag). It must be
    /// idempotent: the same path always yields the same record.
    fn register_file(&self, path: &Path) -> Result<Arc<FileRecord>>;

    /// Look up a previously registered file by full path.
    fn file_by_path(&self, path: &Path) -> Option<Arc<FileRecord>>;

    /// Resolve a module reference relative to the importing script.
    ///
    /// Returns the resolved module identifier, or `None` when the reference
    /// does not resolve. `None` is not an error; callers fall back to the
    /// raw reference. A successful resolution records a
    /// [`crate::ResolvedRef`] on the importing script.
    fn resolve_dependency(&self, script: &Arc<FileRecord>, reference: &str) -> Option<String>;

    /// Bind a descriptor to the script that owns it.
    ///
    /// The graph is the sole writer of the script/descriptor association;
    /// the default implementation performs the first-bind-wins write on the
    /// records themselves.
    fn bind_component(&self, descriptor: &Arc<FileRecord>, script: &Arc<FileRecord>) {
        FileRecord::bind(descriptor, script);
    }
}
