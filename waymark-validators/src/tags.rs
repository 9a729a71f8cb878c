//! Tag conformance validation against the synthesized expected tag set
//! (spec.md §4.12, §8's tag-canonicalization invariant).

use waymark_types::Journey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagIssue {
    pub missing_tag: String,
}

/// Checks that `journey.tags` contains every standard tag
/// [`Journey::expected_standard_tags`] derives from its identity fields.
/// Author-supplied extra tags are never flagged; only omissions are.
#[must_use]
pub fn validate_tags(journey: &Journey) -> Vec<TagIssue> {
    journey
        .expected_standard_tags()
        .into_iter()
        .filter(|expected| !journey.tags.contains(expected))
        .map(|missing_tag| TagIssue { missing_tag })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::{CleanupPolicy, DataPolicy, DataStrategy, JourneyId, Tier};

    fn base_journey() -> Journey {
        Journey {
            id: JourneyId::new("JRN-0001").unwrap(),
            title: "Sample".to_string(),
            tier: Tier::Smoke,
            scope: "login".to_string(),
            actor: "user".to_string(),
            revision: 1,
            tags: Vec::new(),
            module_dependencies: Default::default(),
            data: DataPolicy {
                strategy: DataStrategy::Reuse,
                cleanup: CleanupPolicy::None,
            },
            completion: Vec::new(),
            steps: Vec::new(),
            setup: Vec::new(),
            cleanup: Vec::new(),
            prerequisites: Vec::new(),
            negative_paths: Vec::new(),
            test_data: Vec::new(),
            visual_regression: false,
            accessibility: false,
            performance: None,
        }
    }

    #[test]
    fn missing_standard_tags_are_reported() {
        let journey = base_journey();
        let issues = validate_tags(&journey);
        assert_eq!(issues.len(), 6);
    }

    #[test]
    fn fully_tagged_journey_has_no_issues() {
        let mut journey = base_journey();
        journey.tags = journey.expected_standard_tags();
        assert!(validate_tags(&journey).is_empty());
    }

    #[test]
    fn extra_author_tags_are_never_flagged() {
        let mut journey = base_journey();
        journey.tags = journey.expected_standard_tags();
        journey.tags.push("@author-added".to_string());
        assert!(validate_tags(&journey).is_empty());
    }
}
