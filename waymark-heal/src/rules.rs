//! The fixed healing rule catalog (spec.md §4.15).
//!
//! Each rule is a pure `(code, context) -> FixResult` function gated by
//! `applies(category)`. The four forbidden fixes (`add-sleep`,
//! `remove-assertion`, `force-click`, `bypass-auth`) are never entries in
//! [`RULES`] — they are structurally absent, not config-disabled.

use regex::Regex;
use std::sync::LazyLock;

use waymark_verify::FailureCategory;

/// Per-attempt context handed to a rule's `apply` function.
#[derive(Debug, Clone, Copy)]
pub struct HealContext<'a> {
    pub category: FailureCategory,
    pub explanation: &'a str,
    pub attempt: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixResult {
    pub applied: bool,
    pub code: String,
    pub description: String,
    pub confidence: f64,
}

impl FixResult {
    fn unchanged(code: &str) -> Self {
        Self {
            applied: false,
            code: code.to_string(),
            description: "rule found nothing to mutate".to_string(),
            confidence: 0.0,
        }
    }
}

pub struct FixRule {
    pub name: &'static str,
    pub applies: fn(FailureCategory) -> bool,
    pub apply: fn(&str, HealContext<'_>) -> FixResult,
}

/// Ordered rule list: `missing-await` -> `selector-refine` -> `add-exact` ->
/// `navigation-wait` -> `web-first-assertion` -> `timeout-increase`
/// (spec.md §4.15). The engine selects the first unattempted applicable rule
/// on each iteration.
pub const RULES: &[FixRule] = &[
    FixRule {
        name: "missing-await",
        applies: |c| matches!(c, FailureCategory::Timing | FailureCategory::Script),
        apply: apply_missing_await,
    },
    FixRule {
        name: "selector-refine",
        applies: |c| matches!(c, FailureCategory::Selector),
        apply: apply_selector_refine,
    },
    FixRule {
        name: "add-exact",
        applies: |c| matches!(c, FailureCategory::Selector),
        apply: apply_add_exact,
    },
    FixRule {
        name: "navigation-wait",
        applies: |c| matches!(c, FailureCategory::Navigation),
        apply: apply_navigation_wait,
    },
    FixRule {
        name: "web-first-assertion",
        applies: |c| matches!(c, FailureCategory::Timing | FailureCategory::Script),
        apply: apply_web_first_assertion,
    },
    FixRule {
        name: "timeout-increase",
        applies: |c| matches!(c, FailureCategory::Timing),
        apply: apply_timeout_increase,
    },
];

const ACTION_VERBS: &[&str] = &["click(", "fill(", "check(", "press(", "selectOption(", "type("];

static MISSING_AWAIT_RE: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    ACTION_VERBS
        .iter()
        .map(|verb| {
            let escaped = regex::escape(verb);
            (*verb, Regex::new(&format!(r"(?m)^(\s*)(?:await\s+)?(.*\.{escaped})")).expect("valid regex"))
        })
        .collect()
});

fn apply_missing_await(code: &str, _ctx: HealContext<'_>) -> FixResult {
    for line in code.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("//") || trimmed.starts_with("await ") {
            continue;
        }
        for verb in ACTION_VERBS {
            if trimmed.contains(verb) {
                let fixed_line = line.replacen(trimmed, &format!("await {trimmed}"), 1);
                let new_code = code.replacen(line, &fixed_line, 1);
                return FixResult {
                    applied: true,
                    code: new_code,
                    description: format!("added missing `await` before `{verb}` call"),
                    confidence: 0.7,
                };
            }
        }
    }
    FixResult::unchanged(code)
}

static STRICT_LOCATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(page\.locator\([^)]*\)|page\.getByRole\([^)]*\)|page\.getByText\([^)]*\))(?!\.\w)").expect("valid regex"));

fn apply_selector_refine(code: &str, _ctx: HealContext<'_>) -> FixResult {
    if let Some(m) = STRICT_LOCATOR_RE.find(code) {
        let matched = m.as_str();
        let replacement = format!("{matched}.first()");
        let new_code = format!("{}{}{}", &code[..m.start()], replacement, &code[m.end()..]);
        return FixResult {
            applied: true,
            code: new_code,
            description: "narrowed ambiguous locator with `.first()`".to_string(),
            confidence: 0.6,
        };
    }
    FixResult::unchanged(code)
}

static TEXT_LOCATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"getByText\(([^,)]+)\)").expect("valid regex"));

fn apply_add_exact(code: &str, _ctx: HealContext<'_>) -> FixResult {
    if let Some(caps) = TEXT_LOCATOR_RE.captures(code) {
        let whole = caps.get(0).expect("group 0 always present");
        let text_arg = &caps[1];
        if code[whole.end()..].starts_with(".first()") || text_arg.contains("exact") {
            return FixResult::unchanged(code);
        }
        let replacement = format!("getByText({text_arg}, {{ exact: true }})");
        let new_code = format!("{}{}{}", &code[..whole.start()], replacement, &code[whole.end()..]);
        return FixResult {
            applied: true,
            code: new_code,
            description: "added `{ exact: true }` to a text locator".to_string(),
            confidence: 0.5,
        };
    }
    FixResult::unchanged(code)
}

static GOTO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\s*)(await page\.goto\([^)]*\);)\s*$").expect("valid regex"));

fn apply_navigation_wait(code: &str, _ctx: HealContext<'_>) -> FixResult {
    if let Some(caps) = GOTO_RE.captures(code) {
        if code.contains("waitForLoadState") {
            return FixResult::unchanged(code);
        }
        let whole = caps.get(0).expect("group 0 always present");
        let indent = &caps[1];
        let goto_line = &caps[2];
        let replacement =
            format!("{indent}{goto_line}\n{indent}await page.waitForLoadState('networkidle');");
        let new_code = format!("{}{}{}", &code[..whole.start()], replacement, &code[whole.end()..]);
        return FixResult {
            applied: true,
            code: new_code,
            description: "inserted a load-state wait after navigation".to_string(),
            confidence: 0.6,
        };
    }
    FixResult::unchanged(code)
}

static TOBEVISIBLE_ASSERT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s*)(?:const\s+\w+\s*=\s*)?await\s+(\S+)\.isVisible\(\);?\s*$").expect("valid regex")
});

fn apply_web_first_assertion(code: &str, _ctx: HealContext<'_>) -> FixResult {
    if let Some(caps) = TOBEVISIBLE_ASSERT_RE.captures(code) {
        let whole = caps.get(0).expect("group 0 always present");
        let indent = &caps[1];
        let locator = &caps[2];
        let replacement = format!("{indent}await expect({locator}).toBeVisible();");
        let new_code = format!("{}{}{}", &code[..whole.start()], replacement, &code[whole.end()..]);
        return FixResult {
            applied: true,
            code: new_code,
            description: "replaced a manual visibility poll with a web-first assertion".to_string(),
            confidence: 0.65,
        };
    }
    FixResult::unchanged(code)
}

static TIMEOUT_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"timeout:\s*(\d+)").expect("valid regex"));

fn apply_timeout_increase(code: &str, _ctx: HealContext<'_>) -> FixResult {
    if let Some(caps) = TIMEOUT_OPTION_RE.captures(code) {
        let whole = caps.get(0).expect("group 0 always present");
        let current: u64 = caps[1].parse().unwrap_or(30_000);
        let increased = current.saturating_mul(2);
        let replacement = format!("timeout: {increased}");
        let new_code = format!("{}{}{}", &code[..whole.start()], replacement, &code[whole.end()..]);
        return FixResult {
            applied: true,
            code: new_code,
            description: format!("doubled an explicit timeout from {current}ms to {increased}ms"),
            confidence: 0.4,
        };
    }
    FixResult::unchanged(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(category: FailureCategory) -> HealContext<'static> {
        HealContext {
            category,
            explanation: "",
            attempt: 1,
        }
    }

    #[test]
    fn forbidden_fixes_never_appear_in_the_rule_list() {
        let forbidden = ["add-sleep", "remove-assertion", "force-click", "bypass-auth"];
        for rule in RULES {
            assert!(!forbidden.contains(&rule.name), "forbidden fix {} present in RULES", rule.name);
        }
    }

    #[test]
    fn missing_await_adds_await_before_click() {
        let code = "page.locator('#submit').click();\n";
        let result = apply_missing_await(code, ctx(FailureCategory::Script));
        assert!(result.applied);
        assert!(result.code.starts_with("await "));
    }

    #[test]
    fn missing_await_leaves_already_awaited_code_unchanged() {
        let code = "await page.locator('#submit').click();\n";
        let result = apply_missing_await(code, ctx(FailureCategory::Script));
        assert!(!result.applied);
        assert_eq!(result.code, code);
    }

    #[test]
    fn selector_refine_appends_first_to_ambiguous_locator() {
        let code = "await page.getByRole('button').click();";
        let result = apply_selector_refine(code, ctx(FailureCategory::Selector));
        assert!(result.applied);
        assert!(result.code.contains(".first()"));
    }

    #[test]
    fn navigation_wait_inserts_load_state_wait() {
        let code = "  await page.goto('https://example.com/app');\n";
        let result = apply_navigation_wait(code, ctx(FailureCategory::Navigation));
        assert!(result.applied);
        assert!(result.code.contains("waitForLoadState"));
    }

    #[test]
    fn timeout_increase_doubles_existing_timeout() {
        let code = "await expect(locator).toBeVisible({ timeout: 5000 });";
        let result = apply_timeout_increase(code, ctx(FailureCategory::Timing));
        assert!(result.applied);
        assert!(result.code.contains("timeout: 10000"));
    }

    #[test]
    fn rule_is_unchanged_when_category_does_not_apply() {
        let rule = RULES.iter().find(|r| r.name == "navigation-wait").expect("rule exists");
        assert!(!(rule.applies)(FailureCategory::Selector));
    }
}
