//! Failure classification (spec.md §4.14).
//!
//! Grounded on the teacher's `core::errors::is_auth_error`/
//! `extract_error_message`: a keyword-hit idiom applied here to a catalog
//! of `{category, keyword patterns, explanation, suggestion, isTestIssue}`
//! entries instead of one single-purpose auth check.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureCategory {
    Selector,
    Timing,
    Navigation,
    Data,
    Auth,
    Env,
    Script,
    Unknown,
}

impl FailureCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FailureCategory::Selector => "selector",
            FailureCategory::Timing => "timing",
            FailureCategory::Navigation => "navigation",
            FailureCategory::Data => "data",
            FailureCategory::Auth => "auth",
            FailureCategory::Env => "env",
            FailureCategory::Script => "script",
            FailureCategory::Unknown => "unknown",
        }
    }

    /// Healable categories (spec.md §4.14): `selector`, `timing`,
    /// `navigation`, and partially `data`/`script`. `auth`, `env`, `unknown`
    /// are never healable.
    #[must_use]
    pub fn is_healable(self) -> bool {
        matches!(
            self,
            FailureCategory::Selector
                | FailureCategory::Timing
                | FailureCategory::Navigation
                | FailureCategory::Data
                | FailureCategory::Script
        )
    }
}

struct CategoryRule {
    category: FailureCategory,
    keywords: &'static [&'static str],
    explanation: &'static str,
    suggestion: &'static str,
    is_test_issue: bool,
}

/// Catalog order is the tie-break order: the first-declared category wins a
/// tie on keyword-hit count (spec.md §4.14).
const RULES: &[CategoryRule] = &[
    CategoryRule {
        category: FailureCategory::Selector,
        keywords: &[
            "strict mode violation",
            "resolved to",
            "no element",
            "not found",
            "locator(",
            "getbyrole",
            "getbytestid",
            "multiple elements",
        ],
        explanation: "the locator did not resolve to exactly one element",
        suggestion: "refine the locator to a more specific role/testid/text match",
        is_test_issue: true,
    },
    CategoryRule {
        category: FailureCategory::Timing,
        keywords: &["timeout", "timed out", "exceeded", "waiting for", "deadline"],
        explanation: "the action or assertion exceeded its timeout",
        suggestion: "wait on a stable condition instead of a fixed delay, or raise the timeout",
        is_test_issue: true,
    },
    CategoryRule {
        category: FailureCategory::Navigation,
        keywords: &["net::err_", "navigation failed", "err_connection", "page crashed", "frame was detached"],
        explanation: "navigation or the page itself failed unexpectedly",
        suggestion: "verify the target URL and that the app under test is reachable",
        is_test_issue: true,
    },
    CategoryRule {
        category: FailureCategory::Auth,
        keywords: &["401", "403", "unauthorized", "forbidden", "invalid credentials", "session expired"],
        explanation: "the request or page required authentication that was not satisfied",
        suggestion: "verify the seeded session/credentials for this journey's actor",
        is_test_issue: false,
    },
    CategoryRule {
        category: FailureCategory::Data,
        keywords: &["not found", "404", "record does not exist", "duplicate key", "constraint"],
        explanation: "the test depended on data that was missing or conflicting",
        suggestion: "check the data policy's seed/create/reuse strategy for this journey",
        is_test_issue: true,
    },
    CategoryRule {
        category: FailureCategory::Env,
        keywords: &["econnrefused", "enotfound", "dns", "certificate", "self signed", "proxy"],
        explanation: "the test environment itself was unreachable or misconfigured",
        suggestion: "check environment connectivity and TLS/proxy configuration outside this test",
        is_test_issue: false,
    },
    CategoryRule {
        category: FailureCategory::Script,
        keywords: &["is not a function", "undefined is not", "cannot read propert", "referenceerror", "typeerror"],
        explanation: "the generated or page-object code itself threw a script error",
        suggestion: "inspect the generated test/module for a missing import or bad merge",
        is_test_issue: true,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: FailureCategory,
    pub confidence: f64,
    pub explanation: &'static str,
    pub suggestion: &'static str,
    pub is_test_issue: bool,
}

impl Classification {
    fn unknown() -> Self {
        Self {
            category: FailureCategory::Unknown,
            confidence: 0.0,
            explanation: "no known failure pattern matched this error message",
            suggestion: "inspect the raw error message manually",
            is_test_issue: false,
        }
    }
}

/// Classifies one raw runner error message. Confidence is
/// `min(matches/3, 1)` (spec.md §4.14); the best-scoring category wins, with
/// ties broken by catalog (first-declared) order.
#[must_use]
pub fn classify_failure(message: &str) -> Classification {
    let lower = message.to_ascii_lowercase();
    let mut best: Option<(&CategoryRule, usize)> = None;

    for rule in RULES {
        let hits = rule.keywords.iter().filter(|kw| lower.contains(*kw)).count();
        if hits == 0 {
            continue;
        }
        match best {
            Some((_, best_hits)) if hits <= best_hits => {}
            _ => best = Some((rule, hits)),
        }
    }

    match best {
        Some((rule, hits)) => Classification {
            category: rule.category,
            confidence: (hits as f64 / 3.0).min(1.0),
            explanation: rule.explanation,
            suggestion: rule.suggestion,
            is_test_issue: rule.is_test_issue,
        },
        None => Classification::unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_mode_violation_classifies_as_selector() {
        let c = classify_failure("Error: strict mode violation: locator resolved to 2 elements");
        assert_eq!(c.category, FailureCategory::Selector);
        assert!(c.category.is_healable());
    }

    #[test]
    fn timeout_classifies_as_timing() {
        let c = classify_failure("Timeout 30000ms exceeded while waiting for element to be visible");
        assert_eq!(c.category, FailureCategory::Timing);
    }

    #[test]
    fn unauthorized_classifies_as_auth_and_is_not_healable() {
        let c = classify_failure("Request failed with status 401 Unauthorized");
        assert_eq!(c.category, FailureCategory::Auth);
        assert!(!c.category.is_healable());
    }

    #[test]
    fn unrecognized_message_is_unknown_with_zero_confidence() {
        let c = classify_failure("something entirely unexpected happened");
        assert_eq!(c.category, FailureCategory::Unknown);
        assert_eq!(c.confidence, 0.0);
        assert!(!c.category.is_healable());
    }

    #[test]
    fn confidence_caps_at_one() {
        let c = classify_failure(
            "strict mode violation: locator resolved to multiple elements, getByRole('button') not found",
        );
        assert!(c.confidence <= 1.0);
        assert_eq!(c.category, FailureCategory::Selector);
    }
}
