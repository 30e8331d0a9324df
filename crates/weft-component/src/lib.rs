//! # weft-component
//!
//! Component-descriptor resolution and rewrite engine for the Weft pipeline.
//!
//! A mini-program component is a cluster of same-named sibling files:
//! script, markup, style, and a JSON descriptor. Given a component's script
//! file, this crate discovers and registers the siblings through a cached
//! directory index, resolves the sub-component usages declared in the
//! descriptor's `usingComponents` table, recursively triggers the same
//! analysis for every resolved sub-component, and rewrites the descriptor
//! with resolved identifiers and normalized tag keys.
//!
//! ```text
//! script file ──▶ analysis gate ──▶ sibling discovery ──▶ directory index
//!                      ▲                    │
//!                      │                    ▼ (descriptor bound to script)
//!                      └──── descriptor rewrite ◀── build graph resolver
//! ```
//!
//! The engine is synchronous and owns no files: registration, lookup, and
//! module resolution go through [`weft_graph::BuildGraph`]. It emits
//! `tracing` events and never installs a subscriber.

pub mod config;
pub mod descriptor;
pub mod dir_index;
mod hyphen;
mod processor;
mod siblings;

pub use config::ComponentOptions;
pub use descriptor::RewriteOutput;
pub use dir_index::{DirIndex, DirListing};
pub use hyphen::to_hyphen;
pub use processor::ComponentProcessor;

/// Error type for component engine operations.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// I/O error (directory listing, content loading).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Build graph error.
    #[error(transparent)]
    Graph(#[from] weft_graph::GraphError),
}

/// Result type alias for component engine operations.
pub type Result<T> = std::result::Result<T, ComponentError>;
