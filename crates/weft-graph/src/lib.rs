//! # weft-graph
//!
//! File records and the build-graph interface for the Weft pipeline.
//!
//! The build graph owns every file the pipeline touches. Each file is a
//! shared [`FileRecord`] carrying its classification, lazily loaded content,
//! and the component-analysis state the `weft-component` engine maintains.
//!
//! The [`BuildGraph`] trait is the seam between the component engine and
//! whichever graph implementation hosts it. [`MemoryGraph`] is the in-memory
//! reference implementation used by tests and by embedders that do not bring
//! their own graph.
//!
//! ## Thread Safety
//!
//! Records are `Arc`-shared. Flag transitions are atomic and monotonic, so
//! a record can be observed from several threads even though the component
//! engine itself runs synchronously.

pub mod file;
pub mod graph;
pub mod memory;

pub use file::{FileRecord, ResolvedRef};
pub use graph::BuildGraph;
pub use memory::MemoryGraph;

use std::path::PathBuf;

/// Error type for graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path cannot back a file record (no parent, no stem, or non-UTF-8).
    #[error("path has no usable file name: {0}")]
    InvalidPath(PathBuf),
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
