//! Forbidden-pattern scanning over generated code (spec.md §4.12).
//!
//! Grounded on `waymark-selectors::scan`'s `regex`-over-lines idiom, scoped
//! down from a whole source tree to a single generated file.

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenHit {
    pub rule: &'static str,
    pub line: u32,
    pub column: u32,
    pub severity: Severity,
    pub message: String,
    pub suggestion: &'static str,
}

struct ForbiddenRule {
    name: &'static str,
    pattern: &'static str,
    severity: Severity,
    message: &'static str,
    suggestion: &'static str,
}

/// The fixed rule list (spec.md §4.12): hard-coded waits, `force:true`,
/// class/XPath selectors, `nth-child`, hardcoded URLs/credentials,
/// missing-await on known action verbs, `test.only`, deprecated handle APIs.
const RULES: &[ForbiddenRule] = &[
    ForbiddenRule {
        name: "hardcoded-wait",
        pattern: r"waitForTimeout\(\s*\d+\s*\)",
        severity: Severity::Error,
        message: "hardcoded waitForTimeout is flaky; wait for a condition instead",
        suggestion: "replace with waitForVisible/waitForURL/waitForResponse",
    },
    ForbiddenRule {
        name: "force-click",
        pattern: r"force\s*:\s*true",
        severity: Severity::Error,
        message: "force: true bypasses actionability checks",
        suggestion: "fix the underlying selector/visibility issue instead of forcing the action",
    },
    ForbiddenRule {
        name: "xpath-selector",
        pattern: r#"locator\(\s*['"]//"#,
        severity: Severity::Warning,
        message: "XPath selectors are brittle across markup changes",
        suggestion: "prefer getByRole/getByLabel/getByTestId",
    },
    ForbiddenRule {
        name: "class-selector",
        pattern: r#"locator\(\s*['"]\.[A-Za-z_-]"#,
        severity: Severity::Warning,
        message: "CSS class selectors are brittle across styling changes",
        suggestion: "prefer getByRole/getByLabel/getByTestId",
    },
    ForbiddenRule {
        name: "nth-child",
        pattern: r":nth-child\(",
        severity: Severity::Warning,
        message: "nth-child selectors break when sibling order changes",
        suggestion: "target a stable test id or accessible role instead",
    },
    ForbiddenRule {
        name: "hardcoded-url",
        pattern: r#"page\.goto\(\s*['"]https?://(?:localhost|127\.0\.0\.1|[\w.-]+\.(?:com|dev|io))"#,
        severity: Severity::Warning,
        message: "hardcoded absolute URL couples the test to one environment",
        suggestion: "use a relative path or an environment-provided base URL",
    },
    ForbiddenRule {
        name: "hardcoded-credentials",
        pattern: r#"(?i)(password|secret|token)\s*[:=]\s*['"][^'"]{4,}['"]"#,
        severity: Severity::Error,
        message: "hardcoded credential literal found in generated code",
        suggestion: "bind from testData or an actor fixture instead",
    },
    ForbiddenRule {
        name: "test-only",
        pattern: r"test\.only\(",
        severity: Severity::Error,
        message: "test.only must never reach committed generated code",
        suggestion: "remove .only before regenerating",
    },
    ForbiddenRule {
        name: "deprecated-handle-api",
        pattern: r"\$eval\(|\$\$eval\(|\.\$\(|\.\$\$\(",
        severity: Severity::Warning,
        message: "ElementHandle-style APIs are deprecated in favor of locators",
        suggestion: "use page.locator(...)/getBy* builders instead",
    },
];

/// Known action verbs whose call must be preceded by `await` on the same statement.
const ACTION_VERBS: &[&str] = &[
    ".click(", ".dblclick(", ".fill(", ".check(", ".uncheck(", ".hover(", ".press(", ".selectOption(",
    ".setInputFiles(", ".focus(", ".clear(",
];

fn missing_await_hits(line: &str, line_no: u32) -> Vec<ForbiddenHit> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") || trimmed.starts_with("await ") {
        return Vec::new();
    }
    let mut hits = Vec::new();
    for verb in ACTION_VERBS {
        if let Some(col) = line.find(verb) {
            hits.push(ForbiddenHit {
                rule: "missing-await",
                line: line_no,
                column: col as u32 + 1,
                severity: Severity::Error,
                message: format!("action call '{verb}' is not awaited"),
                suggestion: "prefix the statement with `await`",
            });
            break;
        }
    }
    hits
}

/// Scans `code` for every forbidden pattern, returning one hit per match
/// with its file position, severity, and suggestion (spec.md §4.12,
/// contrapositive of §8's forbidden-patterns invariant).
#[must_use]
pub fn scan_forbidden_patterns(code: &str) -> Vec<ForbiddenHit> {
    let compiled: Vec<(Regex, &ForbiddenRule)> = RULES
        .iter()
        .map(|rule| (Regex::new(rule.pattern).expect("static forbidden pattern compiles"), rule))
        .collect();

    let mut hits = Vec::new();
    for (line_no, line) in code.lines().enumerate() {
        let line_no = line_no as u32 + 1;
        for (re, rule) in &compiled {
            if let Some(m) = re.find(line) {
                hits.push(ForbiddenHit {
                    rule: rule.name,
                    line: line_no,
                    column: m.start() as u32 + 1,
                    severity: rule.severity,
                    message: rule.message.to_string(),
                    suggestion: rule.suggestion,
                });
            }
        }
        hits.extend(missing_await_hits(line, line_no));
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_code_has_no_hits() {
        let code = "await page.getByRole('button', { name: 'Sign In' }).click();\n";
        assert!(scan_forbidden_patterns(code).is_empty());
    }

    #[test]
    fn hardcoded_wait_is_flagged_as_error() {
        let code = "await page.waitForTimeout(3000);\n";
        let hits = scan_forbidden_patterns(code);
        assert!(hits.iter().any(|h| h.rule == "hardcoded-wait" && h.severity == Severity::Error));
    }

    #[test]
    fn force_true_is_flagged() {
        let code = "await page.getByRole('button').click({ force: true });\n";
        let hits = scan_forbidden_patterns(code);
        assert!(hits.iter().any(|h| h.rule == "force-click"));
    }

    #[test]
    fn every_named_forbidden_literal_produces_at_least_one_error_or_warning() {
        let fixtures = [
            "await page.waitForTimeout(100);",
            "await x.click({ force: true });",
            "test.only('x', async () => {});",
        ];
        for fixture in fixtures {
            assert!(!scan_forbidden_patterns(fixture).is_empty(), "{fixture} should be flagged");
        }
    }

    #[test]
    fn class_selector_is_flagged() {
        let code = "await page.locator('.btn-primary').click();\n";
        let hits = scan_forbidden_patterns(code);
        assert!(hits.iter().any(|h| h.rule == "class-selector"));
    }

    #[test]
    fn missing_await_on_click_is_flagged() {
        let code = "page.getByRole('button').click();\n";
        let hits = scan_forbidden_patterns(code);
        assert!(hits.iter().any(|h| h.rule == "missing-await"));
    }

    #[test]
    fn awaited_click_is_not_flagged_as_missing_await() {
        let code = "await page.getByRole('button').click();\n";
        let hits = scan_forbidden_patterns(code);
        assert!(!hits.iter().any(|h| h.rule == "missing-await"));
    }
}
