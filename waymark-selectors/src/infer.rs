//! `inferSelectorWithCatalog(text)` (spec.md §4.10): catalog-first locator
//! inference, falling back to a keyword → ARIA role rule set.

use regex::Regex;
use waymark_types::{LocatorSpec, LocatorStrategy, SelectorCatalog};

struct RoleRule {
    keywords: &'static [&'static str],
    role: &'static str,
}

const ROLE_RULES: &[RoleRule] = &[
    RoleRule { keywords: &["button", "btn"], role: "button" },
    RoleRule { keywords: &["link"], role: "link" },
    RoleRule { keywords: &["textbox", "input", "field", "textfield"], role: "textbox" },
    RoleRule { keywords: &["dropdown", "select", "combobox"], role: "combobox" },
    RoleRule { keywords: &["checkbox"], role: "checkbox" },
    RoleRule { keywords: &["radio"], role: "radio" },
    RoleRule { keywords: &["tab"], role: "tab" },
    RoleRule { keywords: &["menu"], role: "menu" },
    RoleRule { keywords: &["dialog", "modal"], role: "dialog" },
    RoleRule { keywords: &["heading", "title"], role: "heading" },
];

/// Consults the catalog first — by description substring, then by a
/// generated slug checked against known test ids — before falling back to
/// the keyword/ARIA rule set.
#[must_use]
pub fn infer_selector_with_catalog(text: &str, catalog: &SelectorCatalog) -> LocatorSpec {
    if let Some(spec) = suggest_from_description(text, catalog) {
        return spec;
    }
    if let Some(spec) = suggest_from_slug(text, catalog) {
        return spec;
    }
    infer_from_keywords(text)
}

fn suggest_from_description(text: &str, catalog: &SelectorCatalog) -> Option<LocatorSpec> {
    let lower = text.to_ascii_lowercase();
    catalog
        .selectors
        .values()
        .find(|entry| lower.contains(&entry.description.to_ascii_lowercase()))
        .map(entry_to_locator)
}

fn suggest_from_slug(text: &str, catalog: &SelectorCatalog) -> Option<LocatorSpec> {
    let slug = slugify(text);
    if catalog.has_test_id(&slug) {
        return Some(LocatorSpec::test_id(slug));
    }
    catalog
        .selectors
        .get(&slug)
        .map(entry_to_locator)
}

fn entry_to_locator(entry: &waymark_types::SelectorEntry) -> LocatorSpec {
    if let Some(test_id) = &entry.test_id {
        LocatorSpec::test_id(test_id.clone())
    } else if let Some(role) = &entry.role {
        LocatorSpec::role(role.clone(), entry.name.clone())
    } else {
        LocatorSpec::new(LocatorStrategy::TestId, entry.id.clone())
    }
}

fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut last_was_dash = true;
    for ch in text.to_ascii_lowercase().chars() {
        if ch.is_alphanumeric() {
            slug.push(ch);
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn infer_from_keywords(text: &str) -> LocatorSpec {
    let lower = text.to_ascii_lowercase();
    let name = extract_name(text);

    for rule in ROLE_RULES {
        if rule.keywords.iter().any(|kw| lower.contains(kw)) {
            return LocatorSpec::role(rule.role, name);
        }
    }

    match name {
        Some(name) => LocatorSpec::new(LocatorStrategy::Text, name),
        None => LocatorSpec::new(LocatorStrategy::Text, text.trim().to_string()),
    }
}

/// Extracts a name from the first quoted substring, falling back to the
/// word(s) preceding a known descriptor (`"Sign In" button` → `Sign In`).
fn extract_name(text: &str) -> Option<String> {
    let quoted = quoted_substring_regex();
    if let Some(captures) = quoted.captures(text) {
        return captures.get(1).map(|m| m.as_str().to_string());
    }

    let preceding = preceding_descriptor_regex();
    preceding
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn quoted_substring_regex() -> Regex {
    Regex::new(r#"["']([^"']+)["']"#).expect("static quoted-substring pattern compiles")
}

fn preceding_descriptor_regex() -> Regex {
    Regex::new(r"(?i)([A-Za-z][\w\s]*?)\s+(?:button|link|field|input|dropdown|checkbox|tab)\b")
        .expect("static descriptor pattern compiles")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use waymark_types::SelectorEntry;

    #[test]
    fn keyword_rule_maps_button_to_role() {
        let spec = infer_selector_with_catalog("Click the \"Sign In\" button", &SelectorCatalog::default());
        assert_eq!(spec.strategy, LocatorStrategy::Role);
        assert_eq!(spec.value, "button");
    }

    #[test]
    fn catalog_slug_match_prefers_test_id() {
        let mut catalog = SelectorCatalog::default();
        catalog.test_ids.push("submit-btn".to_string());

        let spec = infer_selector_with_catalog("submit btn", &catalog);
        assert_eq!(spec.strategy, LocatorStrategy::TestId);
        assert_eq!(spec.value, "submit-btn");
    }

    #[test]
    fn catalog_description_match_wins_over_keyword_fallback() {
        let mut selectors = BTreeMap::new();
        selectors.insert(
            "welcome-banner".to_string(),
            SelectorEntry {
                id: "welcome-banner".to_string(),
                description: "welcome banner".to_string(),
                test_id: Some("welcome-banner".to_string()),
                role: None,
                name: None,
            },
        );
        let catalog = SelectorCatalog {
            version: 1,
            selectors,
            ..SelectorCatalog::default()
        };

        let spec = infer_selector_with_catalog("User sees the welcome banner", &catalog);
        assert_eq!(spec.value, "welcome-banner");
    }

    #[test]
    fn falls_back_to_text_locator_when_nothing_matches() {
        let spec = infer_selector_with_catalog("a mysterious widget appears", &SelectorCatalog::default());
        assert_eq!(spec.strategy, LocatorStrategy::Text);
    }
}
