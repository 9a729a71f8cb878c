//! Ordered regex → IR-primitive extractors (spec.md §4.3).
//!
//! Order is load-bearing: structured `**Action**:`-prefixed patterns first,
//! then auth/toast, then extended-before-base verb variants (e.g. "click on"
//! before "click"), then fills/selects/checks/assertions/URLs/waits/hovers/
//! focuses. Adding a pattern means inserting it at the right point in
//! [`build_catalog`] and bumping [`PATTERN_VERSION`] only if it can change
//! the outcome of an existing match (inserting purely at the tail of an
//! already-ordered bucket cannot, per spec.md §4.3).

use regex::Regex;
use waymark_types::{LocatorSpec, LocatorStrategy, Primitive, ToastType, ValueSpec};

/// Bumped whenever a pattern's regex or extraction semantics change in a way
/// that could alter which pattern wins for existing input.
pub const PATTERN_VERSION: u32 = 2;

pub struct PatternRecord {
    pub name: &'static str,
    pub primitive_type: &'static str,
    regex: Regex,
    extract: fn(&regex::Captures<'_>) -> Option<Primitive>,
}

fn quoted_re() -> Regex {
    Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("valid regex")
}

fn first_quoted(text: &str) -> Option<String> {
    quoted_re()
        .captures(text)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().to_string())
}

fn role_click(name: Option<String>) -> Primitive {
    Primitive::Click {
        locator: LocatorSpec::role("button", name),
    }
}

fn build_catalog() -> Vec<PatternRecord> {
    vec![
        // --- structured `**Action**:` prefixed ---
        PatternRecord {
            name: "structured-action-goto",
            primitive_type: "goto",
            regex: Regex::new(r"(?i)^\*\*Navigate\*\*:\s*(\S+)").unwrap(),
            extract: |c| {
                Some(Primitive::Goto {
                    url: c[1].to_string(),
                    wait_for_load: None,
                })
            },
        },
        PatternRecord {
            name: "structured-action-click",
            primitive_type: "click",
            regex: Regex::new(r"(?i)^\*\*Click\*\*:\s*(.+)$").unwrap(),
            extract: |c| Some(role_click(Some(c[1].trim().to_string()))),
        },
        // --- bare navigation ---
        // Glossary normalization (`assets/default_glossary.yaml`: "navigate
        // to" / "visit" / "open" all map to "go to") runs before pattern
        // matching (see `step_mapper::map_step`), so every prose navigation
        // phrasing reaches this catalog already rewritten to "go to <url>".
        PatternRecord {
            name: "go-to-bare",
            primitive_type: "goto",
            regex: Regex::new(r"(?i)^go to\s+(\S+)").unwrap(),
            extract: |c| {
                let url = c[1]
                    .trim_end_matches(['.', ','])
                    .trim_matches(['"', '\''])
                    .to_string();
                Some(Primitive::Goto { url, wait_for_load: None })
            },
        },
        // --- auth/toast ---
        PatternRecord {
            name: "sign-in",
            primitive_type: "callModule",
            regex: Regex::new(r"(?i)\bsign(?:s|ed)? in\b").unwrap(),
            extract: |_| {
                Some(Primitive::CallModule {
                    module: "auth".to_string(),
                    method: "signIn".to_string(),
                    args: Vec::new(),
                })
            },
        },
        PatternRecord {
            name: "sign-out",
            primitive_type: "callModule",
            regex: Regex::new(r"(?i)\bsign(?:s|ed)? out\b").unwrap(),
            extract: |_| {
                Some(Primitive::CallModule {
                    module: "auth".to_string(),
                    method: "signOut".to_string(),
                    args: Vec::new(),
                })
            },
        },
        PatternRecord {
            name: "toast-success",
            primitive_type: "expectToast",
            regex: Regex::new(r#"(?i)sees? (?:a )?(?:success )?toast\s*"([^"]*)""#).unwrap(),
            extract: |c| {
                Some(Primitive::ExpectToast {
                    toast_type: ToastType::Success,
                    message: Some(c[1].to_string()),
                })
            },
        },
        // --- extended-before-base verb variants ---
        PatternRecord {
            name: "click-on",
            primitive_type: "click",
            regex: Regex::new(r#"(?i)\bclick on\b.*?"([^"]*)""#).unwrap(),
            extract: |c| Some(role_click(Some(c[1].to_string()))),
        },
        PatternRecord {
            name: "click-quoted",
            primitive_type: "click",
            regex: Regex::new(r#"(?i)\bclick\b.*?"([^"]*)""#).unwrap(),
            extract: |c| Some(role_click(Some(c[1].to_string()))),
        },
        PatternRecord {
            name: "click-bare",
            primitive_type: "click",
            regex: Regex::new(r"(?i)^click\b").unwrap(),
            extract: |c| Some(role_click(first_quoted(c.get(0).unwrap().as_str()))),
        },
        // --- fills ---
        PatternRecord {
            name: "fill-quoted-into-field",
            primitive_type: "fill",
            regex: Regex::new(r#"(?i)\b(?:fill|enter|type)\b.*?"([^"]*)".*?\binto\b\s*"?([^"\.]+)"?"#)
                .unwrap(),
            extract: |c| {
                Some(Primitive::Fill {
                    locator: LocatorSpec::new(LocatorStrategy::Label, c[2].trim().to_string()),
                    value: ValueSpec::literal(c[1].to_string()),
                })
            },
        },
        PatternRecord {
            name: "fill-field-with-value",
            primitive_type: "fill",
            regex: Regex::new(r#"(?i)\bfill\b\s*"?([^"\.]+?)"?\s*\bwith\b\s*"([^"]*)""#).unwrap(),
            extract: |c| {
                Some(Primitive::Fill {
                    locator: LocatorSpec::new(LocatorStrategy::Label, c[1].trim().to_string()),
                    value: ValueSpec::literal(c[2].to_string()),
                })
            },
        },
        // --- selects ---
        PatternRecord {
            name: "select-option",
            primitive_type: "select",
            regex: Regex::new(r#"(?i)\bselect\b\s*"([^"]*)"\s*(?:from|in)\s*"?([^"\.]+)"?"#).unwrap(),
            extract: |c| {
                Some(Primitive::Select {
                    locator: LocatorSpec::new(LocatorStrategy::Label, c[2].trim().to_string()),
                    option: ValueSpec::literal(c[1].to_string()),
                })
            },
        },
        // --- checks ---
        PatternRecord {
            name: "check-box",
            primitive_type: "check",
            regex: Regex::new(r#"(?i)\bcheck\b\s*"([^"]*)""#).unwrap(),
            extract: |c| {
                Some(Primitive::Check {
                    locator: LocatorSpec::new(LocatorStrategy::Label, c[1].to_string()),
                })
            },
        },
        PatternRecord {
            name: "uncheck-box",
            primitive_type: "uncheck",
            regex: Regex::new(r#"(?i)\buncheck\b\s*"([^"]*)""#).unwrap(),
            extract: |c| {
                Some(Primitive::Uncheck {
                    locator: LocatorSpec::new(LocatorStrategy::Label, c[1].to_string()),
                })
            },
        },
        // --- assertions ---
        PatternRecord {
            name: "expect-visible-quoted",
            primitive_type: "expectVisible",
            regex: Regex::new(r#"(?i)\b(?:sees?|should see|expects? to see)\b.*?"([^"]*)""#).unwrap(),
            extract: |c| {
                Some(Primitive::ExpectVisible {
                    locator: LocatorSpec::new(LocatorStrategy::Text, c[1].to_string()),
                })
            },
        },
        PatternRecord {
            name: "expect-not-visible-quoted",
            primitive_type: "expectNotVisible",
            regex: Regex::new(r#"(?i)\b(?:should not see|no longer sees?)\b.*?"([^"]*)""#).unwrap(),
            extract: |c| {
                Some(Primitive::ExpectNotVisible {
                    locator: LocatorSpec::new(LocatorStrategy::Text, c[1].to_string()),
                })
            },
        },
        // --- URLs ---
        PatternRecord {
            name: "expect-url",
            primitive_type: "expectURL",
            regex: Regex::new(r"(?i)\b(?:is redirected to|lands on|url is)\b\s*(\S+)").unwrap(),
            extract: |c| {
                Some(Primitive::ExpectUrl {
                    pattern: c[1].to_string(),
                })
            },
        },
        // --- waits ---
        PatternRecord {
            name: "wait-for-timeout",
            primitive_type: "waitForTimeout",
            regex: Regex::new(r"(?i)\bwaits?\b.*?(\d+)\s*ms\b").unwrap(),
            extract: |c| {
                Some(Primitive::WaitForTimeout {
                    ms: c[1].parse().unwrap_or(0),
                })
            },
        },
        // --- hovers ---
        PatternRecord {
            name: "hover-quoted",
            primitive_type: "hover",
            regex: Regex::new(r#"(?i)\bhovers?\b.*?"([^"]*)""#).unwrap(),
            extract: |c| {
                Some(Primitive::Hover {
                    locator: LocatorSpec::new(LocatorStrategy::Text, c[1].to_string()),
                })
            },
        },
        // --- focuses ---
        PatternRecord {
            name: "focus-quoted",
            primitive_type: "focus",
            regex: Regex::new(r#"(?i)\bfocus(?:es)?\b.*?"([^"]*)""#).unwrap(),
            extract: |c| {
                Some(Primitive::Focus {
                    locator: LocatorSpec::new(LocatorStrategy::Label, c[1].to_string()),
                })
            },
        },
    ]
}

/// The ordered catalog. Built fresh per call — cheap enough that a single
/// `WaymarkContext` just builds it once and reuses it across a compilation.
#[must_use]
pub fn catalog() -> Vec<PatternRecord> {
    build_catalog()
}

/// `matchPattern(text)`: the first pattern whose regex accepts `text` and
/// whose `extract` returns non-null.
#[must_use]
pub fn match_pattern<'a>(
    records: &'a [PatternRecord],
    text: &str,
) -> Option<(&'a PatternRecord, Primitive)> {
    for record in records {
        if let Some(caps) = record.regex.captures(text) {
            if let Some(primitive) = (record.extract)(&caps) {
                return Some((record, primitive));
            }
        }
    }
    None
}
