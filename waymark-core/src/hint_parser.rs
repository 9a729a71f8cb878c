//! Inline `(key=value, …)` hint grammar (spec.md §4.4).

use regex::Regex;

const KNOWN_KEYS: &[&str] = &[
    "role", "testid", "label", "text", "exact", "level", "signal", "module", "wait", "timeout",
];

const ARIA_ROLES: &[&str] = &[
    "button", "link", "textbox", "checkbox", "radio", "combobox", "listbox", "option", "menuitem",
    "tab", "tabpanel", "dialog", "alert", "status", "heading", "img", "list", "listitem", "table",
    "row", "cell", "switch", "slider", "progressbar", "navigation", "banner", "main", "form",
    "search", "region",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hints {
    pub role: Option<String>,
    pub testid: Option<String>,
    pub label: Option<String>,
    pub text: Option<String>,
    pub exact: Option<bool>,
    pub level: Option<u8>,
    pub signal: Option<String>,
    pub module: Option<String>,
    pub wait: Option<String>,
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedHints {
    pub hints: Hints,
    pub clean_text: String,
    pub warnings: Vec<String>,
}

fn hint_block_re() -> Regex {
    Regex::new(r"\(([^()]*)\)").expect("valid regex")
}

fn pair_re() -> Regex {
    Regex::new(r#"([A-Za-z]+)\s*=\s*(?:"([^"]*)"|([^,]+))"#).expect("valid regex")
}

/// `parseHints(text)`: strips the first well-formed `(key=value, …)` block
/// and returns the remaining text plus the parsed hint fields.
#[must_use]
pub fn parse_hints(text: &str) -> ParsedHints {
    let mut warnings = Vec::new();
    let mut hints = Hints::default();

    let Some(m) = hint_block_re().find(text) else {
        return ParsedHints {
            hints,
            clean_text: text.trim().to_string(),
            warnings,
        };
    };

    let body = &text[m.start() + 1..m.end() - 1];
    let mut saw_known_key = false;

    for pair in pair_re().captures_iter(body) {
        let key = pair[1].trim().to_ascii_lowercase();
        let value = pair
            .get(2)
            .or_else(|| pair.get(3))
            .map(|v| v.as_str().trim().to_string())
            .unwrap_or_default();

        if !KNOWN_KEYS.contains(&key.as_str()) {
            warnings.push(format!("unrecognized hint key {key:?}"));
            continue;
        }
        saw_known_key = true;
        apply_hint(&mut hints, &key, &value, &mut warnings);
    }

    if !saw_known_key {
        // Not actually a hint block (e.g. parenthetical prose); leave text untouched.
        return ParsedHints {
            hints: Hints::default(),
            clean_text: text.trim().to_string(),
            warnings: Vec::new(),
        };
    }

    let clean_text = format!("{}{}", &text[..m.start()], &text[m.end()..]);
    ParsedHints {
        hints,
        clean_text: clean_text.trim().to_string(),
        warnings,
    }
}

fn apply_hint(hints: &mut Hints, key: &str, value: &str, warnings: &mut Vec<String>) {
    match key {
        "role" => {
            if !ARIA_ROLES.contains(&value.to_ascii_lowercase().as_str()) {
                warnings.push(format!("unknown ARIA role {value:?}"));
            }
            hints.role = Some(value.to_string());
        }
        "testid" => hints.testid = Some(value.to_string()),
        "label" => hints.label = Some(value.to_string()),
        "text" => hints.text = Some(value.to_string()),
        "exact" => hints.exact = Some(value.eq_ignore_ascii_case("true")),
        "level" => hints.level = value.parse().ok(),
        "signal" => hints.signal = Some(value.to_string()),
        "module" => hints.module = Some(value.to_string()),
        "wait" => hints.wait = Some(value.to_string()),
        "timeout" => hints.timeout = value.parse().ok(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_hint_block_and_parses_testid() {
        let parsed = parse_hints(r#"Click (testid=submit) to continue"#);
        assert_eq!(parsed.hints.testid.as_deref(), Some("submit"));
        assert_eq!(parsed.clean_text, "Click  to continue");
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn unknown_role_produces_warning_not_error() {
        let parsed = parse_hints("Click (role=spaceship)");
        assert_eq!(parsed.hints.role.as_deref(), Some("spaceship"));
        assert!(parsed.warnings.iter().any(|w| w.contains("unknown ARIA role")));
    }

    #[test]
    fn quoted_values_with_spaces_are_supported() {
        let parsed = parse_hints(r#"Click (label="Sign In Now")"#);
        assert_eq!(parsed.hints.label.as_deref(), Some("Sign In Now"));
    }

    #[test]
    fn parenthetical_prose_without_known_keys_is_left_untouched() {
        let parsed = parse_hints("Click the button (it is blue)");
        assert_eq!(parsed.clean_text, "Click the button (it is blue)");
        assert!(parsed.hints.role.is_none());
    }

    #[test]
    fn multiple_pairs_parse_independently() {
        let parsed = parse_hints("Click (role=button, exact=true, timeout=500)");
        assert_eq!(parsed.hints.role.as_deref(), Some("button"));
        assert_eq!(parsed.hints.exact, Some(true));
        assert_eq!(parsed.hints.timeout, Some(500));
    }
}
