//! Runner variant detection (spec.md §4.17): a version check against a
//! reported runner identifier, producing a [`Variant`] the renderer consults
//! to decide which code forms are safe to emit.

use regex::Regex;

use waymark_types::{FeatureAvailability, Variant};

/// Minimum `major.minor` the corresponding feature requires, picked from the
/// runner's own changelog thresholds for the features spec.md §4.17 names.
const ARIA_SNAPSHOTS_MIN: (u32, u32) = (1, 39);
const CLOCK_API_MIN: (u32, u32) = (1, 45);
const TOP_LEVEL_AWAIT_MIN: (u32, u32) = (1, 28);
const PROMISE_ANY_MIN: (u32, u32) = (1, 9);

fn version_re() -> Regex {
    Regex::new(r"(\d+)\.(\d+)(?:\.\d+)?").expect("static version pattern compiles")
}

/// Parses a free-form runner identifier string (e.g. `"playwright 1.42.1"`)
/// and derives a [`Variant`] with the feature map implied by its version.
/// Any string the regex cannot parse falls back to [`Variant::unknown`] —
/// a conservative "assume nothing" variant, not an error: the renderer must
/// still be able to emit something.
#[must_use]
pub fn detect_variant(identifier: &str) -> Variant {
    let Some(caps) = version_re().captures(identifier) else {
        return Variant::unknown();
    };
    let Ok(major) = caps[1].parse::<u32>() else {
        return Variant::unknown();
    };
    let Ok(minor) = caps[2].parse::<u32>() else {
        return Variant::unknown();
    };

    let at_least = |min: (u32, u32)| (major, minor) >= min;

    let features = FeatureAvailability {
        aria_snapshots: at_least(ARIA_SNAPSHOTS_MIN),
        clock_api: at_least(CLOCK_API_MIN),
        top_level_await: at_least(TOP_LEVEL_AWAIT_MIN),
        promise_any: at_least(PROMISE_ANY_MIN),
    };

    Variant::new(identifier.trim().to_string(), features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_version_has_every_feature() {
        let variant = detect_variant("playwright 1.48.0");
        assert!(variant.features.aria_snapshots);
        assert!(variant.features.clock_api);
        assert!(variant.features.top_level_await);
        assert!(variant.features.promise_any);
    }

    #[test]
    fn old_version_lacks_newer_features() {
        let variant = detect_variant("playwright 1.20.0");
        assert!(!variant.features.aria_snapshots);
        assert!(!variant.features.clock_api);
        assert!(variant.features.top_level_await);
    }

    #[test]
    fn unparseable_identifier_falls_back_to_unknown() {
        let variant = detect_variant("not a version");
        assert_eq!(variant, Variant::unknown());
    }

    #[test]
    fn boundary_version_meets_threshold_exactly() {
        let variant = detect_variant("1.39.0");
        assert!(variant.features.aria_snapshots);
    }
}
