//! `renderPrimitive`, `escapeString`, `escapeRegex` (spec.md §4.11).
//!
//! Output is hand-assembled with `String::push_str`/`write!` rather than an
//! EJS-style templating engine — no templating crate appears anywhere in the
//! retrieval pack (see `DESIGN.md`).

use std::fmt::Write as _;

use waymark_types::{FeatureAvailability, LocatorSpec, Primitive, ToastType, ValueSpec, Variant};

use waymark_selectors::to_playwright_locator;

/// Escapes a string for embedding inside a single-quoted JS/TS string
/// literal: backslash first, then the quote character, then newlines as the
/// literal two-character sequence `\n`.
#[must_use]
pub fn escape_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

/// Escapes a string for embedding inside a `/…/` regex literal.
#[must_use]
pub fn escape_regex(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if "\\^$.*+?()[]{}|/".contains(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn quoted(value: &str) -> String {
    format!("'{}'", escape_string(value))
}

fn regex_literal(pattern: &str) -> String {
    format!("/{}/", escape_regex(pattern))
}

fn render_value(value: &ValueSpec) -> String {
    match value {
        ValueSpec::Literal { value } => quoted(value),
        ValueSpec::Actor { value } => format!("actor.{value}"),
        ValueSpec::RunId => "runId".to_string(),
        ValueSpec::Generated { value } => format!("generate({})", quoted(value)),
        ValueSpec::TestData { value } => format!("testData.{value}"),
    }
}

fn render_locator(locator: &LocatorSpec) -> String {
    to_playwright_locator(locator)
}

/// The result of rendering one primitive: the emitted statement plus any
/// warnings accumulated because the active variant lacks a feature the
/// primitive would ideally use (spec.md §4.17: "emit anyway, warn").
#[derive(Debug, Clone)]
pub struct RenderedPrimitive {
    pub statement: String,
    pub warnings: Vec<String>,
}

/// Renders one IR primitive into one runner statement. `variant` gates which
/// code forms may be emitted for constructs that depend on a detected
/// runtime feature (currently only `ExpectToast`'s ARIA-role form).
#[must_use]
pub fn render_primitive(primitive: &Primitive, variant: &Variant) -> RenderedPrimitive {
    let mut warnings = Vec::new();
    let statement = render_inner(primitive, &variant.features, &mut warnings);
    RenderedPrimitive { statement, warnings }
}

fn render_inner(primitive: &Primitive, features: &FeatureAvailability, warnings: &mut Vec<String>) -> String {
    match primitive {
        Primitive::Goto { url, wait_for_load } => {
            let mut out = format!("await page.goto({});", quoted(url));
            if wait_for_load.unwrap_or(false) {
                let _ = write!(out, "\nawait page.waitForLoadState();");
            }
            out
        }
        Primitive::Reload => "await page.reload();".to_string(),
        Primitive::GoBack => "await page.goBack();".to_string(),
        Primitive::GoForward => "await page.goForward();".to_string(),
        Primitive::WaitForUrl { pattern } => format!("await page.waitForURL({});", regex_literal(pattern)),
        Primitive::WaitForResponse { url_pattern } => {
            format!("await page.waitForResponse({});", regex_literal(url_pattern))
        }
        Primitive::WaitForLoadingComplete => "await page.waitForLoadState('networkidle');".to_string(),
        Primitive::WaitForVisible { locator, timeout_ms } => {
            format!(
                "await {}.waitFor({{ state: 'visible'{} }});",
                render_locator(locator),
                timeout_opt(*timeout_ms)
            )
        }
        Primitive::WaitForHidden { locator, timeout_ms } => {
            format!(
                "await {}.waitFor({{ state: 'hidden'{} }});",
                render_locator(locator),
                timeout_opt(*timeout_ms)
            )
        }
        Primitive::WaitForTimeout { ms } => format!("await page.waitForTimeout({ms});"),
        Primitive::WaitForNetworkIdle { timeout_ms } => {
            format!("await page.waitForLoadState('networkidle'{});", timeout_opt(*timeout_ms))
        }
        Primitive::Click { locator } => format!("await {}.click();", render_locator(locator)),
        Primitive::DblClick { locator } => format!("await {}.dblclick();", render_locator(locator)),
        Primitive::RightClick { locator } => {
            format!("await {}.click({{ button: 'right' }});", render_locator(locator))
        }
        Primitive::Hover { locator } => format!("await {}.hover();", render_locator(locator)),
        Primitive::Focus { locator } => format!("await {}.focus();", render_locator(locator)),
        Primitive::Clear { locator } => format!("await {}.clear();", render_locator(locator)),
        Primitive::Fill { locator, value } => {
            format!("await {}.fill({});", render_locator(locator), render_value(value))
        }
        Primitive::Select { locator, option } => {
            format!("await {}.selectOption({});", render_locator(locator), render_value(option))
        }
        Primitive::Check { locator } => format!("await {}.check();", render_locator(locator)),
        Primitive::Uncheck { locator } => format!("await {}.uncheck();", render_locator(locator)),
        Primitive::Press { key, locator } => match locator {
            Some(locator) => format!("await {}.press('{key}');", render_locator(locator)),
            None => format!("await page.keyboard.press('{key}');"),
        },
        Primitive::Upload { locator, files } => {
            let list = files.iter().map(|f| quoted(f)).collect::<Vec<_>>().join(", ");
            format!("await {}.setInputFiles([{list}]);", render_locator(locator))
        }
        Primitive::CallModule { module, method, args } => {
            format!("await {module}.{method}({});", args.join(", "))
        }
        Primitive::ExpectVisible { locator } => format!("await expect({}).toBeVisible();", render_locator(locator)),
        Primitive::ExpectNotVisible { locator } => {
            format!("await expect({}).not.toBeVisible();", render_locator(locator))
        }
        Primitive::ExpectHidden { locator } => format!("await expect({}).toBeHidden();", render_locator(locator)),
        Primitive::ExpectEnabled { locator } => format!("await expect({}).toBeEnabled();", render_locator(locator)),
        Primitive::ExpectDisabled { locator } => {
            format!("await expect({}).toBeDisabled();", render_locator(locator))
        }
        Primitive::ExpectChecked { locator } => format!("await expect({}).toBeChecked();", render_locator(locator)),
        Primitive::ExpectText { locator, text } => {
            format!("await expect({}).toHaveText({});", render_locator(locator), quoted(text))
        }
        Primitive::ExpectValue { locator, value } => {
            format!("await expect({}).toHaveValue({});", render_locator(locator), quoted(value))
        }
        Primitive::ExpectContainsText { locator, text } => {
            format!(
                "await expect({}).toContainText({});",
                render_locator(locator),
                quoted(text)
            )
        }
        Primitive::ExpectCount { locator, count } => {
            format!("await expect({}).toHaveCount({count});", render_locator(locator))
        }
        Primitive::ExpectUrl { pattern } => format!("await expect(page).toHaveURL({});", regex_literal(pattern)),
        Primitive::ExpectTitle { title } => format!("await expect(page).toHaveTitle({});", quoted(title)),
        Primitive::ExpectToast { toast_type, message } => render_toast(*toast_type, message.as_deref(), features, warnings),
        Primitive::Blocked { reason, source_text } => format!(
            "throw new Error({}); // unmapped step: {}",
            quoted(reason),
            escape_string(source_text)
        ),
    }
}

fn timeout_opt(timeout_ms: Option<u32>) -> String {
    timeout_ms.map_or_else(String::new, |ms| format!(", timeout: {ms}"))
}

fn render_toast(
    toast_type: ToastType,
    message: Option<&str>,
    features: &FeatureAvailability,
    warnings: &mut Vec<String>,
) -> String {
    let locator = if features.aria_snapshots {
        "page.getByRole('status')".to_string()
    } else {
        warnings.push(format!(
            "expectToast({toast_type:?}) prefers an ARIA role locator but the active variant lacks ariaSnapshots; emitting a CSS fallback"
        ));
        "page.locator('[role=\"status\"], .toast')".to_string()
    };
    match message {
        Some(message) => format!("await expect({locator}).toContainText({});", quoted(message)),
        None => format!("await expect({locator}).toBeVisible();"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::LocatorStrategy;

    #[test]
    fn escape_string_escapes_backslash_quote_and_newline_in_order() {
        assert_eq!(escape_string("a\\b'c\nd"), "a\\\\b\\'c\\nd");
    }

    #[test]
    fn escape_regex_escapes_metacharacters() {
        assert_eq!(escape_regex("a.b*c"), "a\\.b\\*c");
    }

    #[test]
    fn click_renders_playwright_click_call() {
        let p = Primitive::Click {
            locator: LocatorSpec::role("button", Some("Sign In".to_string())),
        };
        let rendered = render_primitive(&p, &Variant::unknown());
        assert!(rendered.statement.contains("getByRole('button'"));
        assert!(rendered.statement.ends_with("click();"));
    }

    #[test]
    fn blocked_primitive_renders_a_throwing_statement() {
        let p = Primitive::Blocked {
            reason: "no mapping".into(),
            source_text: "Do the thing".into(),
        };
        let rendered = render_primitive(&p, &Variant::unknown());
        assert!(rendered.statement.starts_with("throw new Error("));
    }

    #[test]
    fn toast_without_aria_snapshots_warns_and_falls_back() {
        let p = Primitive::ExpectToast {
            toast_type: ToastType::Success,
            message: Some("Saved".to_string()),
        };
        let rendered = render_primitive(&p, &Variant::unknown());
        assert!(!rendered.warnings.is_empty());
        assert!(rendered.statement.contains(".toast"));
    }

    #[test]
    fn toast_with_aria_snapshots_uses_role_locator_and_warns_nothing() {
        let p = Primitive::ExpectToast {
            toast_type: ToastType::Success,
            message: Some("Saved".to_string()),
        };
        let variant = Variant::new("modern", FeatureAvailability::all());
        let rendered = render_primitive(&p, &variant);
        assert!(rendered.warnings.is_empty());
        assert!(rendered.statement.contains("getByRole('status')"));
    }
}
