//! Descriptor resolution and rewriting.

use std::sync::Arc;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use weft_graph::FileRecord;

use crate::hyphen::to_hyphen;
use crate::processor::ComponentProcessor;
use crate::Result;

/// Descriptor field declaring sub-component usages.
const USING_COMPONENTS_KEY: &str = "usingComponents";

/// Rewritten descriptor content handed back to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutput {
    /// Descriptor bytes to persist (UTF-8 JSON).
    pub content: Vec<u8>,
}

impl ComponentProcessor {
    /// Resolve and rewrite a component descriptor.
    ///
    /// The `usingComponents` table is rebuilt in document order: tag keys
    /// are hyphen-normalized, values are replaced by their resolved module
    /// identifiers (falling back to the raw reference when resolution
    /// yields nothing), and entries without a usable reference are dropped.
    /// Every resolved sub-component re-enters
    /// [`analyse_script`](Self::analyse_script), which is how discovery
    /// propagates across the usage graph.
    ///
    /// A descriptor that does not parse as JSON is logged and returned
    /// unmodified: one malformed descriptor must not abort the build. A
    /// descriptor without a `usingComponents` mapping or without a bound
    /// component script passes through byte-for-byte.
    ///
    /// # Errors
    ///
    /// Propagates content-load failures, re-serialization failures, and
    /// failures from the recursive analysis of resolved sub-components.
    /// The JSON *parse* failure is the one contained fault.
    pub fn rewrite_descriptor(&self, file: &Arc<FileRecord>) -> Result<RewriteOutput> {
        let original = file.load_content()?;

        let mut config: Value = match serde_json::from_slice(&original) {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(
                    path = %file.full_path().display(),
                    error = %err,
                    "failed to parse component descriptor"
                );
                return Ok(RewriteOutput {
                    content: original.to_vec(),
                });
            }
        };

        let Some(script) = file.component() else {
            return Ok(RewriteOutput {
                content: original.to_vec(),
            });
        };
        let Some(usages) = config.get(USING_COMPONENTS_KEY).and_then(Value::as_object) else {
            return Ok(RewriteOutput {
                content: original.to_vec(),
            });
        };

        let mut rewritten = Map::new();
        for (tag, value) in usages {
            let Some(reference) = value.as_str().filter(|v| !v.is_empty()) else {
                tracing::debug!(
                    path = %file.full_path().display(),
                    tag = %tag,
                    "dropping component usage without a module reference"
                );
                continue;
            };

            let resolved = self
                .graph
                .resolve_dependency(&script, reference)
                .unwrap_or_else(|| reference.to_string());
            rewritten.insert(to_hyphen(tag), Value::String(resolved));

            // A resolution backed by a registered file pulls that
            // sub-component's own cluster into the build.
            if let Some(target) = script
                .resolution(reference)
                .and_then(|r| r.file)
                .and_then(|path| self.graph.file_by_path(&path))
            {
                self.analyse_script(&target)?;
            }
        }

        config[USING_COMPONENTS_KEY] = Value::Object(rewritten);
        Ok(RewriteOutput {
            content: to_vec_indented(&config)?,
        })
    }
}

/// Serialize with stable 4-space indentation, keys in insertion order.
fn to_vec_indented(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}
