//! Component analysis gate and sibling discovery.

use std::path::PathBuf;
use std::sync::Arc;

use weft_graph::FileRecord;
use weft_target::TargetKind;

use crate::processor::ComponentProcessor;
use crate::Result;

/// Sibling extensions probed inside the source tree, in fixed order.
/// Markup dialects first, then style dialects, then the raw script.
const SIBLING_EXTENSIONS: [&str; 9] = [
    "wxml", "swan", "axml", "ttml", "acss", "ttss", "wxss", "css", "js",
];

/// What a sibling extension means for the component cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiblingKind {
    /// Platform-native component markup; toggles the matching flag on the
    /// script record.
    NativeMarkup(TargetKind),
    /// Stylesheet dialect; carries no flag.
    Style,
    /// The component script extension itself; carries no flag.
    Script,
}

fn sibling_kind(ext: &str) -> Option<SiblingKind> {
    for target in TargetKind::ALL {
        if target.native_markup_ext() == Some(ext) {
            return Some(SiblingKind::NativeMarkup(target));
        }
    }
    if TargetKind::ALL
        .iter()
        .any(|t| t.native_style_ext() == Some(ext))
    {
        return Some(SiblingKind::Style);
    }
    (ext == "js").then_some(SiblingKind::Script)
}

impl ComponentProcessor {
    /// Run component analysis for a script file, at most once per record.
    ///
    /// The analysis claim is taken before any work, so re-entry (including
    /// recursive re-entry through usage-graph cycles) is a no-op. Targets
    /// without native component composition skip discovery entirely; the
    /// claim still sticks.
    ///
    /// # Errors
    ///
    /// Propagates directory-listing and registration failures from sibling
    /// discovery.
    pub fn analyse_script(&self, script: &Arc<FileRecord>) -> Result<()> {
        if !script.claim_analysis() {
            return Ok(());
        }
        if !self.options.target().supports_native_components() {
            return Ok(());
        }
        self.register_sibling_files(script)
    }

    /// Discover and register the definition files sharing the script's
    /// base name, and bind the component descriptor among them.
    fn register_sibling_files(&self, script: &Arc<FileRecord>) -> Result<()> {
        let mut descriptor: Option<Arc<FileRecord>> = None;
        let mut deferred: Vec<PathBuf> = Vec::new();

        if !self.options.is_in_source_dir(script.full_path()) {
            // External module location: the graph has no prior knowledge of
            // these files, so group the directory once and take every file
            // sharing the script's base name.
            let listing = self.dir_index.files(script.dir())?;
            for path in listing.get(script.base_name()).into_iter().flatten() {
                let record = self.graph.register_file(path)?;
                if let Some(SiblingKind::NativeMarkup(target)) = sibling_kind(record.extension()) {
                    script.mark_native(target);
                }
                if record.is_json() {
                    match &descriptor {
                        Some(first) => tracing::warn!(
                            script = %script.full_path().display(),
                            kept = %first.full_path().display(),
                            ignored = %record.full_path().display(),
                            "component has multiple descriptor candidates; keeping the first"
                        ),
                        None => descriptor = Some(record),
                    }
                }
            }
        } else {
            // Inside the source tree every file is already known to the
            // graph, so probe by identity. A descriptor claimed by another
            // script means the cluster was processed before: register
            // nothing.
            let stem = script.dir().join(script.base_name());
            if let Some(json) = self.graph.file_by_path(&stem.with_extension("json")) {
                if json.component().is_none() {
                    for ext in SIBLING_EXTENSIONS {
                        let Some(sibling) = self.graph.file_by_path(&stem.with_extension(ext))
                        else {
                            continue;
                        };
                        deferred.push(sibling.full_path().to_path_buf());
                        if let Some(SiblingKind::NativeMarkup(target)) = sibling_kind(ext) {
                            script.mark_native(target);
                        }
                    }
                    descriptor = Some(json);
                }
            }
        }

        if let Some(json) = descriptor {
            json.mark_component_config();
            self.graph.bind_component(&json, script);
            tracing::debug!(
                script = %script.full_path().display(),
                descriptor = %json.full_path().display(),
                "bound component descriptor"
            );
            // descriptor goes last so downstream processing order stays
            // deterministic: plain siblings first, descriptor after
            deferred.push(json.full_path().to_path_buf());
        }

        for path in deferred {
            self.graph.register_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_kinds() {
        assert_eq!(
            sibling_kind("wxml"),
            Some(SiblingKind::NativeMarkup(TargetKind::Wx))
        );
        assert_eq!(
            sibling_kind("swan"),
            Some(SiblingKind::NativeMarkup(TargetKind::Swan))
        );
        assert_eq!(
            sibling_kind("axml"),
            Some(SiblingKind::NativeMarkup(TargetKind::Ant))
        );
        assert_eq!(
            sibling_kind("ttml"),
            Some(SiblingKind::NativeMarkup(TargetKind::Tt))
        );
        for style in ["acss", "ttss", "wxss", "css"] {
            assert_eq!(sibling_kind(style), Some(SiblingKind::Style));
        }
        assert_eq!(sibling_kind("js"), Some(SiblingKind::Script));
        assert_eq!(sibling_kind("ts"), None);
        assert_eq!(sibling_kind("json"), None);
    }

    #[test]
    fn test_every_probe_extension_is_classified() {
        for ext in SIBLING_EXTENSIONS {
            assert!(sibling_kind(ext).is_some(), "unclassified: {ext}");
        }
    }
}
