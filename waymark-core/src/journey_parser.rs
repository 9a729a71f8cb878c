//! Frontmatter extraction, schema validation, and Markdown body parsing
//! (spec.md §4.1).

use std::fmt;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use waymark_types::{CompletionSignal, DataPolicy, ModuleDependencies, PerformanceBudget, TestDataSet, Tier};

use crate::errors::ParseError;

/// The journey YAML frontmatter, validated but not yet lowered to IR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyFrontmatter {
    pub id: String,
    pub title: String,
    pub status: String,
    pub tier: Tier,
    pub scope: String,
    pub actor: String,
    #[serde(default)]
    pub revision: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub module_dependencies: ModuleDependencies,
    #[serde(default)]
    pub data: Option<DataPolicy>,
    #[serde(default)]
    pub completion: Vec<CompletionSignal>,
    #[serde(default)]
    pub test_refs: Vec<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub status_reason: Option<String>,
    #[serde(default)]
    pub linked_issues: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub test_data: Vec<TestDataSet>,
    #[serde(default)]
    pub visual_regression: bool,
    #[serde(default)]
    pub accessibility: bool,
    #[serde(default)]
    pub performance: Option<PerformanceBudget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProceduralStep {
    pub number: u32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_ac: Option<u32>,
}

/// The parsed journey: validated frontmatter plus the three recognized body
/// sections. Anything outside them is dropped (spec.md §4.1's "lossy by
/// design").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedJourney {
    pub frontmatter: JourneyFrontmatter,
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
    pub procedural_steps: Vec<ProceduralStep>,
    pub data_notes: Vec<String>,
}

pub fn parse(path: &Path) -> Result<ParsedJourney, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|e| ParseError::Yaml {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_content(&text, &path.display().to_string())
}

pub fn parse_content(text: &str, virtual_path: &str) -> Result<ParsedJourney, ParseError> {
    let (frontmatter_yaml, body) = split_frontmatter(text)
        .ok_or_else(|| ParseError::frontmatter_not_found(virtual_path))?;

    let frontmatter: JourneyFrontmatter =
        serde_yaml::from_str(frontmatter_yaml).map_err(|e| ParseError::Yaml {
            path: virtual_path.to_string(),
            message: e.to_string(),
        })?;

    let issues = validate_frontmatter(&frontmatter);
    if !issues.is_empty() {
        return Err(ParseError::validation(virtual_path, &issues));
    }

    let sections = parse_body(body);

    Ok(ParsedJourney {
        frontmatter,
        acceptance_criteria: sections.acceptance_criteria,
        procedural_steps: sections.procedural_steps,
        data_notes: sections.data_notes,
    })
}

/// `tryParseContent` from spec.md §4.1: same as [`parse_content`] but never
/// panics on a malformed document, surfacing every failure as `Err`.
pub fn try_parse_content(text: &str, virtual_path: &str) -> Result<ParsedJourney, ParseError> {
    parse_content(text, virtual_path)
}

fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("---")?;
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let end = rest.find("\n---")?;
    let yaml = &rest[..end];
    let after_marker = &rest[end + 4..];
    let body = after_marker.strip_prefix('\n').unwrap_or(after_marker);
    Some((yaml, body))
}

fn journey_id_re() -> Regex {
    Regex::new(r"^JRN-\d{4}$").expect("valid regex")
}

fn validate_frontmatter(fm: &JourneyFrontmatter) -> Vec<String> {
    let mut issues = Vec::new();

    if !journey_id_re().is_match(&fm.id) {
        issues.push(format!("id {:?} does not match JRN-\\d{{4}}", fm.id));
    }
    if fm.title.trim().is_empty() {
        issues.push("title must not be empty".to_string());
    }
    if fm.scope.trim().is_empty() {
        issues.push("scope must not be empty".to_string());
    }
    if fm.actor.trim().is_empty() {
        issues.push("actor must not be empty".to_string());
    }

    match fm.status.as_str() {
        "clarified" if fm.completion.is_empty() => {
            issues.push("status 'clarified' requires at least one completion signal".to_string());
        }
        "implemented" if fm.test_refs.is_empty() => {
            issues.push("status 'implemented' requires at least one test reference".to_string());
        }
        "quarantined" => {
            if fm.owner.as_deref().unwrap_or("").trim().is_empty() {
                issues.push("status 'quarantined' requires an owner".to_string());
            }
            if fm.status_reason.as_deref().unwrap_or("").trim().is_empty() {
                issues.push("status 'quarantined' requires a statusReason".to_string());
            }
            if fm.linked_issues.is_empty() {
                issues.push("status 'quarantined' requires at least one linked issue".to_string());
            }
        }
        _ => {}
    }

    issues
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    AcceptanceCriteria,
    ProceduralSteps,
    DataNotes,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::None => "none",
            Section::AcceptanceCriteria => "acceptance_criteria",
            Section::ProceduralSteps => "procedural_steps",
            Section::DataNotes => "data_notes",
        })
    }
}

struct BodySections {
    acceptance_criteria: Vec<AcceptanceCriterion>,
    procedural_steps: Vec<ProceduralStep>,
    data_notes: Vec<String>,
}

fn classify_heading(text: &str) -> Section {
    let lower = text.trim().to_ascii_lowercase();
    match lower.as_str() {
        "acceptance criteria" => Section::AcceptanceCriteria,
        "procedural steps" => Section::ProceduralSteps,
        "data notes" | "environment" | "data/environment notes" => Section::DataNotes,
        _ => Section::None,
    }
}

fn ac_heading_re() -> Regex {
    Regex::new(r"(?i)^AC-(\d+)\s*(?::\s*(.*))?$").expect("valid regex")
}

fn ac_backref_re() -> Regex {
    Regex::new(r"\(AC-(\d+)\)").expect("valid regex")
}

/// Parses the Markdown body via `pulldown-cmark`'s streaming event API,
/// tracking the active section by its most recent H2 heading and the active
/// AC entry by its most recent H3 heading.
fn parse_body(body: &str) -> BodySections {
    use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

    let mut section = Section::None;
    let mut acceptance_criteria: Vec<AcceptanceCriterion> = Vec::new();
    let mut procedural_steps: Vec<ProceduralStep> = Vec::new();
    let mut data_notes: Vec<String> = Vec::new();

    let mut heading_level: Option<HeadingLevel> = None;
    let mut heading_text = String::new();
    let mut in_heading = false;

    let mut in_item = false;
    let mut item_text = String::new();
    let mut procedural_counter: u32 = 0;

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = true;
                heading_level = Some(level);
                heading_text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                in_heading = false;
                match heading_level {
                    Some(HeadingLevel::H2) => {
                        section = classify_heading(&heading_text);
                        tracing::debug!(section = %section, "entered body section");
                    }
                    Some(HeadingLevel::H3) if section == Section::AcceptanceCriteria => {
                        if let Some(caps) = ac_heading_re().captures(heading_text.trim()) {
                            let number: u32 = caps[1].parse().unwrap_or(0);
                            let title = caps.get(2).map(|m| m.as_str().trim().to_string());
                            acceptance_criteria.push(AcceptanceCriterion {
                                number,
                                title: title.filter(|t| !t.is_empty()),
                                bullets: Vec::new(),
                            });
                        }
                    }
                    _ => {}
                }
                heading_level = None;
            }
            Event::Text(text) if in_heading => {
                heading_text.push_str(&text);
            }
            Event::Start(Tag::Item) => {
                in_item = true;
                item_text.clear();
            }
            Event::End(TagEnd::Item) => {
                in_item = false;
                let text = item_text.trim().to_string();
                if !text.is_empty() {
                    match section {
                        Section::AcceptanceCriteria => {
                            if let Some(current) = acceptance_criteria.last_mut() {
                                current.bullets.push(text);
                            }
                        }
                        Section::ProceduralSteps => {
                            procedural_counter += 1;
                            let linked_ac = ac_backref_re()
                                .captures(&text)
                                .and_then(|c| c[1].parse().ok());
                            procedural_steps.push(ProceduralStep {
                                number: procedural_counter,
                                text,
                                linked_ac,
                            });
                        }
                        Section::DataNotes => data_notes.push(text),
                        Section::None => {}
                    }
                }
            }
            Event::Text(text) if in_item => {
                item_text.push_str(&text);
            }
            Event::Code(text) if in_item => {
                item_text.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak if in_item => {
                item_text.push(' ');
            }
            _ => {}
        }
    }

    BodySections {
        acceptance_criteria,
        procedural_steps,
        data_notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"---
id: JRN-0001
title: User can log in
status: clarified
tier: smoke
scope: login
actor: user
completion:
  - type: url
    value: /dashboard
---

## Acceptance Criteria

### AC-1: User can log in

- Navigate to /login
- Click "Sign In" button
- User sees "Welcome"

## Procedural Steps

1. Open the login page (AC-1)
2. Submit valid credentials

## Data Notes

- Requires a seeded user account
"#;

    #[test]
    fn parses_frontmatter_and_sections() {
        let parsed = parse_content(SAMPLE, "sample.md").expect("parse succeeds");
        assert_eq!(parsed.frontmatter.id, "JRN-0001");
        assert_eq!(parsed.frontmatter.tier, Tier::Smoke);
        assert_eq!(parsed.acceptance_criteria.len(), 1);
        assert_eq!(parsed.acceptance_criteria[0].bullets.len(), 3);
        assert_eq!(parsed.procedural_steps.len(), 2);
        assert_eq!(parsed.procedural_steps[0].linked_ac, Some(1));
        assert_eq!(parsed.data_notes.len(), 1);
    }

    #[test]
    fn missing_frontmatter_is_coded_error() {
        let err = parse_content("no frontmatter here", "broken.md").unwrap_err();
        assert!(matches!(err, ParseError::Coded(_)));
    }

    #[test]
    fn clarified_status_without_completion_signal_fails_validation() {
        let text = SAMPLE.replacen(
            "completion:\n  - type: url\n    value: /dashboard\n",
            "",
            1,
        );
        let err = parse_content(&text, "sample.md").unwrap_err();
        assert!(matches!(err, ParseError::Coded(_)));
    }

    #[test]
    fn quarantined_status_requires_owner_and_reason_and_issue() {
        let text = SAMPLE
            .replace("status: clarified", "status: quarantined")
            .replace(
                "completion:\n  - type: url\n    value: /dashboard\n",
                "",
            );
        let err = parse_content(&text, "sample.md").unwrap_err();
        assert!(matches!(err, ParseError::Coded(_)));
    }
}
