//! LLKB learned-pattern row and the Wilson-score confidence it carries.

use serde::{Deserialize, Serialize};

use crate::ids::{JourneyId, PatternId};
use crate::primitive::Primitive;

/// `{id, originalText, normalizedText, mappedPrimitive, confidence, successCount,
/// failCount, sourceJourneys, lastUsed, createdAt, promotedToCore, promotedAt?}`
/// (spec.md §3). `confidence` is always the lower bound of the Wilson 95%
/// interval over `(successCount, successCount + failCount)`, recomputed on
/// every update by the store — never set directly by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedPattern {
    pub id: PatternId,
    pub original_text: String,
    pub normalized_text: String,
    pub mapped_primitive: Primitive,
    pub confidence: f64,
    pub success_count: u32,
    pub fail_count: u32,
    pub source_journeys: Vec<JourneyId>,
    /// Unix epoch seconds.
    pub last_used: i64,
    /// Unix epoch seconds.
    pub created_at: i64,
    pub promoted_to_core: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted_at: Option<i64>,
}

impl LearnedPattern {
    #[must_use]
    pub fn total_observations(&self) -> u32 {
        self.success_count + self.fail_count
    }

    #[must_use]
    pub fn is_promotable(&self, min_confidence: f64, min_success: u32) -> bool {
        !self.promoted_to_core
            && self.confidence >= min_confidence
            && self.success_count >= min_success
            && distinct_source_count(&self.source_journeys) >= 2
    }
}

fn distinct_source_count(sources: &[JourneyId]) -> usize {
    let mut seen: Vec<&JourneyId> = Vec::new();
    for source in sources {
        if !seen.contains(&source) {
            seen.push(source);
        }
    }
    seen.len()
}

/// Lower bound of the 95% Wilson score interval over `(successes, trials)`.
///
/// Returns `0.5` when there are no observations, matching spec.md §4.6's
/// "no observations → 0.5" default.
#[must_use]
pub fn wilson_lower_bound(successes: u32, trials: u32) -> f64 {
    if trials == 0 {
        return 0.5;
    }

    const Z: f64 = 1.96;
    let n = f64::from(trials);
    let p_hat = f64::from(successes) / n;
    let z2 = Z * Z;

    let denominator = 1.0 + z2 / n;
    let centre = p_hat + z2 / (2.0 * n);
    let margin = Z * ((p_hat * (1.0 - p_hat) / n) + z2 / (4.0 * n * n)).sqrt();

    ((centre - margin) / denominator).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_observations_is_half() {
        assert!((wilson_lower_bound(0, 0) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn more_successes_at_fixed_trials_raises_confidence() {
        let low = wilson_lower_bound(3, 10);
        let high = wilson_lower_bound(9, 10);
        assert!(high > low);
    }

    #[test]
    fn all_success_is_below_one_but_high() {
        let c = wilson_lower_bound(20, 20);
        assert!(c > 0.8 && c < 1.0);
    }

    #[test]
    fn monotonic_in_success_count_at_fixed_fail_count() {
        // recordPatternSuccess never decreases confidence at fixed fail count (spec.md §8)
        let fail = 2;
        let mut prev = wilson_lower_bound(0, fail);
        for success in 1..20 {
            let next = wilson_lower_bound(success, success + fail);
            assert!(next >= prev, "confidence decreased at success={success}");
            prev = next;
        }
    }

    #[test]
    fn monotonic_decreasing_in_fail_count_at_fixed_success_count() {
        // recordPatternFailure never increases confidence at fixed success count
        let success = 10;
        let mut prev = wilson_lower_bound(success, success);
        for fail in 1..20 {
            let next = wilson_lower_bound(success, success + fail);
            assert!(next <= prev, "confidence increased at fail={fail}");
            prev = next;
        }
    }
}
