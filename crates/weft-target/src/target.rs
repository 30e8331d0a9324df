//! Target kinds and their native file dialects.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unrecognized target id.
#[derive(Debug, thiserror::Error)]
#[error("unknown build target: {0}")]
pub struct UnknownTarget(String);

/// The mini-program platforms Weft builds for.
///
/// Each target is identified by the short id used in build configuration
/// (`wx`, `swan`, `ant`, `tt`, `quick`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// WeChat mini program
    Wx,
    /// Baidu smart program
    Swan,
    /// Alipay mini program
    Ant,
    /// Toutiao/ByteDance micro app
    Tt,
    /// Quick app
    Quick,
}

impl TargetKind {
    /// Every supported target, in declaration order.
    pub const ALL: [TargetKind; 5] = [
        TargetKind::Wx,
        TargetKind::Swan,
        TargetKind::Ant,
        TargetKind::Tt,
        TargetKind::Quick,
    ];

    /// Short configuration id for this target.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Wx => "wx",
            TargetKind::Swan => "swan",
            TargetKind::Ant => "ant",
            TargetKind::Tt => "tt",
            TargetKind::Quick => "quick",
        }
    }

    /// Whether the target composes UI from native component file clusters.
    ///
    /// Quick app has no native component model, so component sibling
    /// analysis is skipped entirely for it.
    pub fn supports_native_components(&self) -> bool {
        !matches!(self, TargetKind::Quick)
    }

    /// Extension of the target's native component markup dialect.
    pub fn native_markup_ext(&self) -> Option<&'static str> {
        match self {
            TargetKind::Wx => Some("wxml"),
            TargetKind::Swan => Some("swan"),
            TargetKind::Ant => Some("axml"),
            TargetKind::Tt => Some("ttml"),
            TargetKind::Quick => None,
        }
    }

    /// Extension of the target's native stylesheet dialect.
    pub fn native_style_ext(&self) -> Option<&'static str> {
        match self {
            TargetKind::Wx => Some("wxss"),
            TargetKind::Swan => Some("css"),
            TargetKind::Ant => Some("acss"),
            TargetKind::Tt => Some("ttss"),
            TargetKind::Quick => None,
        }
    }
}

impl std::str::FromStr for TargetKind {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wx" => Ok(TargetKind::Wx),
            "swan" => Ok(TargetKind::Swan),
            "ant" => Ok(TargetKind::Ant),
            "tt" => Ok(TargetKind::Tt),
            "quick" => Ok(TargetKind::Quick),
            other => Err(UnknownTarget(other.to_string())),
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_round_trip() {
        for target in TargetKind::ALL {
            assert_eq!(target.as_str().parse::<TargetKind>().unwrap(), target);
        }
        assert!("web".parse::<TargetKind>().is_err());
    }

    #[test]
    fn test_quick_has_no_native_components() {
        assert!(!TargetKind::Quick.supports_native_components());
        assert!(TargetKind::Quick.native_markup_ext().is_none());
        assert!(TargetKind::Quick.native_style_ext().is_none());

        for target in [TargetKind::Wx, TargetKind::Swan, TargetKind::Ant, TargetKind::Tt] {
            assert!(target.supports_native_components());
            assert!(target.native_markup_ext().is_some());
            assert!(target.native_style_ext().is_some());
        }
    }

    #[test]
    fn test_markup_dialects_are_distinct() {
        let exts: Vec<_> = TargetKind::ALL
            .iter()
            .filter_map(|t| t.native_markup_ext())
            .collect();
        assert_eq!(exts, vec!["wxml", "swan", "axml", "ttml"]);
    }

    #[test]
    fn test_serde_uses_short_ids() {
        let json = serde_json::to_string(&TargetKind::Wx).unwrap();
        assert_eq!(json, "\"wx\"");
        let parsed: TargetKind = serde_json::from_str("\"swan\"").unwrap();
        assert_eq!(parsed, TargetKind::Swan);
    }
}
