//! `VerifySummary`: runner-result summarization (spec.md §4.16).

use std::collections::BTreeMap;

use waymark_types::{RunnerReport, TestStatus};

use crate::classifier::{classify_failure, Classification, FailureCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStatus {
    Passed,
    Failed,
    Flaky,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedTest {
    pub title_path: Vec<String>,
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifySummary {
    pub status: VerifyStatus,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub flaky: usize,
    pub failed_tests: Vec<FailedTest>,
    pub class_histogram: BTreeMap<&'static str, usize>,
    pub recommendations: Vec<String>,
}

/// Summarizes a [`RunnerReport`]: flattens nested suites, classifies every
/// failed test's errors, and derives overall status plus recommendations.
/// An empty report (no tests extracted at all) summarizes as `Error`
/// (spec.md §4.16).
#[must_use]
pub fn summarize(report: &RunnerReport) -> VerifySummary {
    let flat = report.flatten();
    if flat.is_empty() {
        return VerifySummary {
            status: VerifyStatus::Error,
            total: 0,
            passed: 0,
            failed: 0,
            flaky: 0,
            failed_tests: Vec::new(),
            class_histogram: BTreeMap::new(),
            recommendations: vec!["no test results found in the runner report".to_string()],
        };
    }

    let mut passed = 0;
    let mut failed = 0;
    let mut flaky = 0;
    let mut failed_tests = Vec::new();
    let mut class_histogram: BTreeMap<&'static str, usize> = BTreeMap::new();

    for (title_path, result) in &flat {
        match result.status {
            TestStatus::Passed if result.retry > 0 => {
                flaky += 1;
                passed += 1;
            }
            TestStatus::Passed | TestStatus::Skipped => passed += 1,
            TestStatus::Failed | TestStatus::TimedOut => {
                failed += 1;
                let classification = result
                    .errors
                    .first()
                    .map(|e| classify_failure(&e.message))
                    .unwrap_or_else(|| classify_failure(""));
                *class_histogram.entry(classification.category.as_str()).or_insert(0) += 1;
                failed_tests.push(FailedTest {
                    title_path: title_path.clone(),
                    classification,
                });
            }
        }
    }

    let status = if failed > 0 {
        VerifyStatus::Failed
    } else if flaky > 0 {
        VerifyStatus::Flaky
    } else {
        VerifyStatus::Passed
    };

    let recommendations = derive_recommendations(&failed_tests, flaky);

    VerifySummary {
        status,
        total: flat.len(),
        passed,
        failed,
        flaky,
        failed_tests,
        class_histogram,
        recommendations,
    }
}

fn derive_recommendations(failed_tests: &[FailedTest], flaky: usize) -> Vec<String> {
    let mut out = Vec::new();
    if flaky > 0 {
        out.push(format!("{flaky} test(s) passed only after retry; investigate flakiness before trusting this run"));
    }
    let mut by_category: BTreeMap<FailureCategory, usize> = BTreeMap::new();
    for test in failed_tests {
        *by_category.entry(test.classification.category).or_insert(0) += 1;
    }
    for (category, count) in by_category {
        let suggestion = failed_tests
            .iter()
            .find(|t| t.classification.category == category)
            .map(|t| t.classification.suggestion)
            .unwrap_or("");
        out.push(format!("{count} failure(s) classified as {}: {suggestion}", category.as_str()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::{RunnerError, RunnerSpec, RunnerSuite, TestCase, TestResult};

    fn report_with(results: Vec<TestResult>) -> RunnerReport {
        RunnerReport {
            suites: vec![RunnerSuite {
                title: "login".to_string(),
                suites: vec![],
                specs: vec![RunnerSpec {
                    title: "login.spec.ts".to_string(),
                    tests: vec![TestCase {
                        title: "user can log in".to_string(),
                        results,
                    }],
                }],
            }],
        }
    }

    #[test]
    fn all_passed_summarizes_as_passed() {
        let report = report_with(vec![TestResult {
            status: TestStatus::Passed,
            errors: vec![],
            retry: 0,
            duration_ms: 10,
            title_path: vec![],
        }]);
        let summary = summarize(&report);
        assert_eq!(summary.status, VerifyStatus::Passed);
        assert_eq!(summary.passed, 1);
    }

    #[test]
    fn failure_is_classified_and_recommended() {
        let report = report_with(vec![TestResult {
            status: TestStatus::Failed,
            errors: vec![RunnerError {
                message: "strict mode violation: locator resolved to 2 elements".to_string(),
                stack: None,
            }],
            retry: 0,
            duration_ms: 10,
            title_path: vec![],
        }]);
        let summary = summarize(&report);
        assert_eq!(summary.status, VerifyStatus::Failed);
        assert_eq!(summary.failed_tests[0].classification.category, FailureCategory::Selector);
        assert!(!summary.recommendations.is_empty());
    }

    #[test]
    fn pass_after_retry_is_flaky() {
        let report = report_with(vec![TestResult {
            status: TestStatus::Passed,
            errors: vec![],
            retry: 1,
            duration_ms: 10,
            title_path: vec![],
        }]);
        let summary = summarize(&report);
        assert_eq!(summary.status, VerifyStatus::Flaky);
        assert_eq!(summary.flaky, 1);
    }

    #[test]
    fn empty_report_summarizes_as_error() {
        let summary = summarize(&RunnerReport::default());
        assert_eq!(summary.status, VerifyStatus::Error);
    }
}
