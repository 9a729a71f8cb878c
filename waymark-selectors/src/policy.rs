//! Strategy priority, forbidden-pattern filtering, locator validation, and
//! Playwright locator rendering (spec.md §4.9).

use regex::Regex;
use waymark_types::{LocatorOptions, LocatorSpec, LocatorStrategy};

/// Default strategy priority: `role > label > placeholder > text > testid > css`.
#[must_use]
pub fn default_priority() -> Vec<LocatorStrategy> {
    vec![
        LocatorStrategy::Role,
        LocatorStrategy::Label,
        LocatorStrategy::Placeholder,
        LocatorStrategy::Text,
        LocatorStrategy::TestId,
        LocatorStrategy::Css,
    ]
}

fn rank(strategy: LocatorStrategy, priority: &[LocatorStrategy]) -> usize {
    priority
        .iter()
        .position(|s| *s == strategy)
        .unwrap_or(priority.len())
}

/// `selectBestLocator(candidates)`: filters out candidates whose value matches
/// any forbidden-pattern regex, sorts the remainder by priority rank (lower
/// rank wins), and returns the head.
#[must_use]
pub fn select_best_locator(
    candidates: &[LocatorSpec],
    forbidden_patterns: &[Regex],
    priority: &[LocatorStrategy],
) -> Option<LocatorSpec> {
    candidates
        .iter()
        .filter(|c| !is_forbidden(c, forbidden_patterns))
        .min_by_key(|c| rank(c.strategy, priority))
        .cloned()
}

fn is_forbidden(spec: &LocatorSpec, forbidden_patterns: &[Regex]) -> bool {
    forbidden_patterns.iter().any(|re| re.is_match(&spec.value))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorWarning {
    pub kind: &'static str,
    pub message: String,
}

impl LocatorWarning {
    fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// `validateLocator(spec)`: heuristic warnings for brittle CSS selectors.
/// Never returns errors, only warnings — callers decide severity.
#[must_use]
pub fn validate_locator(spec: &LocatorSpec) -> Vec<LocatorWarning> {
    let mut warnings = Vec::new();
    if spec.strategy != LocatorStrategy::Css {
        return warnings;
    }

    let value = &spec.value;
    if value.starts_with('/') || value.contains("//") || value.starts_with("./") {
        warnings.push(LocatorWarning::new(
            "xpath_in_css",
            format!("CSS locator '{value}' looks like an XPath expression"),
        ));
    }
    if value.contains(":nth-child") {
        warnings.push(LocatorWarning::new(
            "nth_child",
            format!("CSS locator '{value}' relies on sibling position (nth-child)"),
        ));
    }
    if looks_like_numeric_id(value) {
        warnings.push(LocatorWarning::new(
            "numeric_id",
            format!("CSS locator '{value}' targets a numeric/generated id"),
        ));
    }
    if !is_syntactically_plausible_css(value) {
        warnings.push(LocatorWarning::new(
            "css_syntax",
            format!("CSS locator '{value}' does not look like a valid selector"),
        ));
    }
    warnings
}

fn looks_like_numeric_id(value: &str) -> bool {
    value
        .split(['#', '.', ' ', '>'])
        .filter(|segment| !segment.is_empty())
        .any(|segment| segment.chars().any(char::is_numeric) && segment.len() > 3)
}

fn is_syntactically_plausible_css(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed.chars().all(|c| {
            c.is_alphanumeric() || "#.-_ >[]=\"':*~^$".contains(c)
        })
}

/// `toPlaywrightLocator(spec)`: renders a locator spec into the test
/// runner's locator builder syntax, escaping backslashes first, then the
/// target quote character, then newlines as literal `\n`.
#[must_use]
pub fn to_playwright_locator(spec: &LocatorSpec) -> String {
    let value = escape_value(&spec.value);
    match spec.strategy {
        LocatorStrategy::Role => render_role(&value, spec.options.as_ref()),
        LocatorStrategy::Label => format!("page.getByLabel('{value}')"),
        LocatorStrategy::Placeholder => format!("page.getByPlaceholder('{value}')"),
        LocatorStrategy::Text => format!("page.getByText('{value}')"),
        LocatorStrategy::TestId => format!("page.getByTestId('{value}')"),
        LocatorStrategy::Css => format!("page.locator('{value}')"),
    }
}

fn render_role(role: &str, options: Option<&LocatorOptions>) -> String {
    let Some(options) = options.filter(|o| !o.is_empty()) else {
        return format!("page.getByRole('{role}')");
    };

    let mut fields = Vec::new();
    if let Some(name) = &options.name {
        fields.push(format!("name: '{}'", escape_value(name)));
    }
    if let Some(exact) = options.exact {
        fields.push(format!("exact: {exact}"));
    }
    if let Some(level) = options.level {
        fields.push(format!("level: {level}"));
    }
    if fields.is_empty() {
        format!("page.getByRole('{role}')")
    } else {
        format!("page.getByRole('{role}', {{ {} }})", fields.join(", "))
    }
}

fn escape_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str) -> LocatorSpec {
        LocatorSpec::role(name, None)
    }

    #[test]
    fn best_locator_prefers_role_over_css() {
        let candidates = vec![
            LocatorSpec::new(LocatorStrategy::Css, ".btn-primary"),
            role("button"),
        ];
        let best = select_best_locator(&candidates, &[], &default_priority()).unwrap();
        assert_eq!(best.strategy, LocatorStrategy::Role);
    }

    #[test]
    fn forbidden_pattern_excludes_a_candidate_even_if_higher_priority() {
        let forbidden = vec![Regex::new(r"^button$").unwrap()];
        let candidates = vec![role("button"), LocatorSpec::test_id("submit-btn")];
        let best = select_best_locator(&candidates, &forbidden, &default_priority()).unwrap();
        assert_eq!(best.strategy, LocatorStrategy::TestId);
    }

    #[test]
    fn validate_locator_flags_nth_child() {
        let spec = LocatorSpec::new(LocatorStrategy::Css, "div:nth-child(3)");
        let warnings = validate_locator(&spec);
        assert!(warnings.iter().any(|w| w.kind == "nth_child"));
    }

    #[test]
    fn validate_locator_is_silent_for_non_css_strategies() {
        assert!(validate_locator(&role("button")).is_empty());
    }

    #[test]
    fn playwright_render_escapes_quotes_and_newlines() {
        let spec = LocatorSpec::new(LocatorStrategy::Text, "it's\na test");
        let rendered = to_playwright_locator(&spec);
        assert_eq!(rendered, "page.getByText('it\\'s\\na test')");
    }

    #[test]
    fn playwright_role_render_includes_name_and_exact() {
        let spec = LocatorSpec::role("button", Some("Sign In".to_string())).with_options(
            waymark_types::LocatorOptions {
                name: Some("Sign In".to_string()),
                exact: Some(true),
                level: None,
            },
        );
        let rendered = to_playwright_locator(&spec);
        assert_eq!(
            rendered,
            "page.getByRole('button', { name: 'Sign In', exact: true })"
        );
    }
}
