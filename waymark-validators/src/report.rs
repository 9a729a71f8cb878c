//! `validateCode`: the composite validator that runs every check and
//! partitions issues by severity (spec.md §4.12).

use waymark_types::Journey;

use crate::coverage::{compute_ac_coverage, CoverageReport};
use crate::forbidden::{scan_forbidden_patterns, ForbiddenHit, Severity};
use crate::tags::{validate_tags, TagIssue};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub forbidden: Vec<ForbiddenHit>,
    pub tags: Vec<TagIssue>,
    pub coverage: CoverageReport,
}

impl ValidationReport {
    #[must_use]
    pub fn errors(&self) -> Vec<&ForbiddenHit> {
        self.forbidden.iter().filter(|h| h.severity == Severity::Error).collect()
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<&ForbiddenHit> {
        self.forbidden.iter().filter(|h| h.severity == Severity::Warning).collect()
    }

    #[must_use]
    pub fn infos(&self) -> Vec<&ForbiddenHit> {
        self.forbidden.iter().filter(|h| h.severity == Severity::Info).collect()
    }

    /// True when any `error`-severity issue is present (spec.md §7's
    /// "exits non-zero when any error-severity issue is present").
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }
}

/// Runs the forbidden-pattern scan, tag conformance check, and AC-coverage
/// computation over one generated file and its source journey, returning a
/// single partitioned report. Never throws: every check returns issue lists.
#[must_use]
pub fn validate_code(generated_code: &str, journey: &Journey) -> ValidationReport {
    ValidationReport {
        forbidden: scan_forbidden_patterns(generated_code),
        tags: validate_tags(journey),
        coverage: compute_ac_coverage(journey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::{CleanupPolicy, DataPolicy, DataStrategy, JourneyId, Tier};

    fn journey() -> Journey {
        Journey {
            id: JourneyId::new("JRN-0001").unwrap(),
            title: "Sample".to_string(),
            tier: Tier::Smoke,
            scope: "login".to_string(),
            actor: "user".to_string(),
            revision: 1,
            tags: vec![
                "@artk".to_string(),
                "@journey".to_string(),
                "@JRN-0001".to_string(),
                "@tier-smoke".to_string(),
                "@scope-login".to_string(),
                "@actor-user".to_string(),
            ],
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
    fn clean_input_has_no_errors() {
        let report = validate_code("await page.getByRole('button').click();\n", &journey());
        assert!(!report.has_errors());
        assert!(report.tags.is_empty());
    }

    #[test]
    fn forbidden_literal_surfaces_as_an_error() {
        let report = validate_code("await page.waitForTimeout(500);\n", &journey());
        assert!(report.has_errors());
    }
}
