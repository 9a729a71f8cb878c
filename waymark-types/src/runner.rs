//! External runner interface shapes (spec.md §6): the black box this system
//! never invokes directly, only consumes the typed result of.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub status: TestStatus,
    #[serde(default)]
    pub errors: Vec<RunnerError>,
    pub retry: u32,
    pub duration_ms: u64,
    pub title_path: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerSpec {
    pub title: String,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub title: String,
    #[serde(default)]
    pub results: Vec<TestResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerSuite {
    pub title: String,
    #[serde(default)]
    pub suites: Vec<RunnerSuite>,
    #[serde(default)]
    pub specs: Vec<RunnerSpec>,
}

/// `{suites -> specs -> tests -> results}` (spec.md §6).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerReport {
    #[serde(default)]
    pub suites: Vec<RunnerSuite>,
}

impl RunnerReport {
    /// Recursively flatten every `(title_path, TestResult)` pair out of the
    /// nested suite/spec/test tree (spec.md §4.16's "extracts per-test
    /// results recursively from nested suites").
    #[must_use]
    pub fn flatten(&self) -> Vec<(Vec<String>, TestResult)> {
        let mut out = Vec::new();
        for suite in &self.suites {
            flatten_suite(suite, &mut Vec::new(), &mut out);
        }
        out
    }
}

fn flatten_suite(suite: &RunnerSuite, prefix: &mut Vec<String>, out: &mut Vec<(Vec<String>, TestResult)>) {
    prefix.push(suite.title.clone());
    for spec in &suite.specs {
        prefix.push(spec.title.clone());
        for test in &spec.tests {
            prefix.push(test.title.clone());
            for result in &test.results {
                out.push((prefix.clone(), result.clone()));
            }
            prefix.pop();
        }
        prefix.pop();
    }
    for nested in &suite.suites {
        flatten_suite(nested, prefix, out);
    }
    prefix.pop();
}
