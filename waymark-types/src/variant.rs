//! Runner/browser variant identity and feature-availability map (spec.md §3, §4.17).

use serde::{Deserialize, Serialize};

/// Feature flags that gate which generated constructs a variant can consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureAvailability {
    #[serde(default)]
    pub aria_snapshots: bool,
    #[serde(default)]
    pub clock_api: bool,
    #[serde(default)]
    pub top_level_await: bool,
    #[serde(default)]
    pub promise_any: bool,
}

impl FeatureAvailability {
    /// Every feature flag on, used as the baseline for the newest supported variant.
    #[must_use]
    pub fn all() -> Self {
        Self {
            aria_snapshots: true,
            clock_api: true,
            top_level_await: true,
            promise_any: true,
        }
    }

    /// Every feature flag off, the conservative fallback for an unrecognized variant.
    #[must_use]
    pub fn none() -> Self {
        Self {
            aria_snapshots: false,
            clock_api: false,
            top_level_await: false,
            promise_any: false,
        }
    }
}

impl Default for FeatureAvailability {
    fn default() -> Self {
        Self::none()
    }
}

/// `{identifier, features}` — the detected runner/engine identity plus what it can do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub identifier: String,
    pub features: FeatureAvailability,
}

impl Variant {
    #[must_use]
    pub fn new(identifier: impl Into<String>, features: FeatureAvailability) -> Self {
        Self {
            identifier: identifier.into(),
            features,
        }
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self::new("unknown", FeatureAvailability::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variant_has_no_features() {
        let v = Variant::unknown();
        assert_eq!(v.features, FeatureAvailability::none());
    }

    #[test]
    fn all_features_differs_from_none() {
        assert_ne!(FeatureAvailability::all(), FeatureAvailability::none());
    }
}
