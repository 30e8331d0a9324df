//! The component processor: engine state shared across one build run.

use std::sync::Arc;

use weft_graph::BuildGraph;

use crate::config::ComponentOptions;
use crate::dir_index::DirIndex;

/// Component-descriptor resolution and rewrite engine.
///
/// One processor lives for one build run. It owns the directory index and
/// borrows everything else: files and resolution belong to the hosting
/// [`BuildGraph`].
///
/// The two entry points mirror how the pipeline feeds files in arbitrary
/// order: [`analyse_script`](Self::analyse_script) when a component script
/// is processed, [`rewrite_descriptor`](Self::rewrite_descriptor) when its
/// descriptor is. Descriptor rewriting re-enters script analysis for every
/// resolved sub-component, which is how discovery spreads across the whole
/// usage graph.
#[derive(Debug)]
pub struct ComponentProcessor {
    pub(crate) graph: Arc<dyn BuildGraph>,
    pub(crate) options: ComponentOptions,
    pub(crate) dir_index: DirIndex,
}

impl ComponentProcessor {
    /// Create a processor over `graph` for one build run.
    pub fn new(graph: Arc<dyn BuildGraph>, options: ComponentOptions) -> Self {
        Self {
            graph,
            options,
            dir_index: DirIndex::new(),
        }
    }

    /// The options this processor runs with.
    pub fn options(&self) -> &ComponentOptions {
        &self.options
    }

    /// The directory index owned by this run.
    pub fn dir_index(&self) -> &DirIndex {
        &self.dir_index
    }
}
