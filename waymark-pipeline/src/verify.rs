//! Verification: invoking the external test runner (a black box per spec.md
//! §6) and summarizing its report.

use std::path::Path;

use waymark_types::RunnerReport;
use waymark_verify::{summarize, VerifySummary};

/// Options accepted by the external runner invocation, mirroring spec.md
/// §6's `{timeout, retries, headed, debug, grep?, project?, repeatEach?,
/// failOnFlaky?}`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub timeout_ms: u64,
    pub retries: u32,
    pub headed: bool,
    pub debug: bool,
    pub grep: Option<String>,
    pub project: Option<String>,
    pub repeat_each: u32,
    pub fail_on_flaky: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            retries: 0,
            headed: false,
            debug: false,
            grep: None,
            project: None,
            repeat_each: 1,
            fail_on_flaky: false,
        }
    }
}

/// The external test runner collaborator. Spawning the actual process (a
/// Playwright CLI invocation) is explicitly out of this crate's scope per
/// spec.md §1's Non-goals; callers (`waymark-cli`, or a test's stub) supply
/// an implementation.
pub trait TestRunner {
    fn run(&self, spec_path: &Path, options: &RunOptions) -> anyhow::Result<RunnerReport>;
}

/// Runs `spec_path` through `runner` and summarizes the resulting report.
pub fn verify(runner: &dyn TestRunner, spec_path: &Path, options: &RunOptions) -> anyhow::Result<VerifySummary> {
    let report = runner.run(spec_path, options)?;
    Ok(summarize(&report))
}

/// True when `summary.failOnFlaky` should have failed the run even though
/// every test eventually passed (spec.md §6's `failOnFlaky` option).
#[must_use]
pub fn should_fail_on_flaky(summary: &VerifySummary, options: &RunOptions) -> bool {
    options.fail_on_flaky && summary.flaky > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::{RunnerSpec, RunnerSuite, TestCase, TestResult, TestStatus};

    struct StubRunner {
        status: TestStatus,
        retry: u32,
    }

    impl TestRunner for StubRunner {
        fn run(&self, _spec_path: &Path, _options: &RunOptions) -> anyhow::Result<RunnerReport> {
            Ok(RunnerReport {
                suites: vec![RunnerSuite {
                    title: "suite".to_string(),
                    suites: vec![],
                    specs: vec![RunnerSpec {
                        title: "spec".to_string(),
                        tests: vec![TestCase {
                            title: "test".to_string(),
                            results: vec![TestResult {
                                status: self.status,
                                errors: vec![],
                                retry: self.retry,
                                duration_ms: 5,
                                title_path: vec![],
                            }],
                        }],
                    }],
                }],
            })
        }
    }

    #[test]
    fn verify_summarizes_a_passing_run() {
        let runner = StubRunner { status: TestStatus::Passed, retry: 0 };
        let summary = verify(&runner, Path::new("x.spec.ts"), &RunOptions::default()).unwrap();
        assert_eq!(summary.passed, 1);
    }

    #[test]
    fn should_fail_on_flaky_respects_the_option() {
        let runner = StubRunner { status: TestStatus::Passed, retry: 1 };
        let summary = verify(&runner, Path::new("x.spec.ts"), &RunOptions::default()).unwrap();
        assert!(!should_fail_on_flaky(&summary, &RunOptions::default()));

        let strict = RunOptions { fail_on_flaky: true, ..RunOptions::default() };
        assert!(should_fail_on_flaky(&summary, &strict));
    }
}
