//! Source-tree selector catalog scanning (spec.md §4.10).
//!
//! Grounded on the teacher's `tools/src/search.rs`: a gitignore-aware
//! `ignore::WalkBuilder` directory walk combined with `globset::GlobSet`
//! include/exclude filtering and `regex::Regex` content scans, repurposed
//! from ad hoc text search into a fixed two-pass extraction (test-id
//! occurrences, then CSS debt).

use std::collections::BTreeMap;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use regex::Regex;
use waymark_types::{CssDebtEntry, CssDebtPriority, CssUsage, SelectorCatalog, SelectorEntry};

use crate::errors::SelectorsError;

const CATALOG_VERSION: u32 = 1;
const DEFAULT_INCLUDE_GLOBS: &[&str] = &["**/*.tsx", "**/*.jsx", "**/*.ts", "**/*.js", "**/*.html"];
const DEFAULT_EXCLUDE_GLOBS: &[&str] = &["**/node_modules/**", "**/dist/**", "**/build/**"];

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: std::path::PathBuf,
    pub test_id_attribute: String,
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
    pub follow_links: bool,
}

impl ScanOptions {
    #[must_use]
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self {
            root: root.into(),
            test_id_attribute: "data-testid".to_string(),
            include_globs: DEFAULT_INCLUDE_GLOBS.iter().map(|s| (*s).to_string()).collect(),
            exclude_globs: DEFAULT_EXCLUDE_GLOBS.iter().map(|s| (*s).to_string()).collect(),
            follow_links: false,
        }
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, SelectorsError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| SelectorsError::invalid_glob(format!("'{pattern}': {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| SelectorsError::invalid_glob(e.to_string()))
}

/// Two-pass scan: a `data-testid`-occurrence pass populates `testIds` and
/// `selectors`; a secondary CSS-debt pass flags class/ID selectors found in
/// scanned sources. Non-UTF8 or unreadable files are skipped, not fatal.
pub fn scan_source_tree(options: &ScanOptions) -> Result<SelectorCatalog, SelectorsError> {
    let include = build_glob_set(&options.include_globs)?;
    let exclude = build_glob_set(&options.exclude_globs)?;
    let test_id_re = test_id_regex(&options.test_id_attribute)?;
    let css_debt_re = css_debt_regex();

    let mut selectors: BTreeMap<String, SelectorEntry> = BTreeMap::new();
    let mut test_ids: Vec<String> = Vec::new();
    let mut css_debt: Vec<CssDebtEntry> = Vec::new();

    let mut builder = WalkBuilder::new(&options.root);
    builder.follow_links(options.follow_links);
    builder.hidden(true);
    builder.filter_entry(|entry| entry.file_name() != ".git");
    builder.sort_by_file_path(Path::cmp);

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let rel = match entry.path().strip_prefix(&options.root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        if !include.is_match(rel) || exclude.is_match(rel) {
            continue;
        }

        let Ok(contents) = std::fs::read_to_string(entry.path()) else {
            continue;
        };
        let rel_display = rel.display().to_string();

        for (line_no, line) in contents.lines().enumerate() {
            for capture in test_id_re.captures_iter(line) {
                let test_id = capture[1].to_string();
                if !test_ids.contains(&test_id) {
                    test_ids.push(test_id.clone());
                }
                selectors.entry(test_id.clone()).or_insert_with(|| SelectorEntry {
                    id: test_id.clone(),
                    description: format!("elements with test id '{test_id}'"),
                    test_id: Some(test_id.clone()),
                    role: None,
                    name: None,
                });
            }

            for debt in css_debt_matches(&css_debt_re, line, &rel_display, line_no as u32 + 1) {
                merge_css_debt(&mut css_debt, debt);
            }
        }
    }

    test_ids.sort();
    Ok(SelectorCatalog {
        version: CATALOG_VERSION,
        selectors,
        components: BTreeMap::new(),
        pages: BTreeMap::new(),
        test_ids,
        css_debt,
    })
}

fn test_id_regex(attribute: &str) -> Result<Regex, SelectorsError> {
    let escaped = regex::escape(attribute);
    Regex::new(&format!(r#"{escaped}\s*=\s*["']([^"']+)["']"#))
        .map_err(|e| SelectorsError::scan_io(attribute, e.to_string()))
}

fn css_debt_regex() -> Regex {
    Regex::new(r#"(?:className|class)\s*=\s*["']([^"']+)["']|(\.[A-Za-z_][\w-]*)\s*\{"#)
        .expect("static css debt pattern compiles")
}

fn css_debt_matches(re: &Regex, line: &str, file: &str, line_no: u32) -> Vec<CssDebtEntry> {
    let mut out = Vec::new();
    for capture in re.captures_iter(line) {
        let selector = capture
            .get(1)
            .or_else(|| capture.get(2))
            .map(|m| m.as_str().trim().to_string());
        let Some(selector) = selector else { continue };
        if selector.is_empty() {
            continue;
        }
        let priority = classify_css_debt_priority(&selector);
        out.push(CssDebtEntry {
            selector: selector.clone(),
            usages: vec![CssUsage {
                file: file.to_string(),
                line: line_no,
            }],
            priority,
            reason: "class/CSS selector used where a test-id or role would be stable".to_string(),
        });
    }
    out
}

fn classify_css_debt_priority(selector: &str) -> CssDebtPriority {
    let tokens = selector.split_whitespace().count();
    if selector.contains("nth-child") || tokens > 3 {
        CssDebtPriority::High
    } else if tokens > 1 {
        CssDebtPriority::Medium
    } else {
        CssDebtPriority::Low
    }
}

fn merge_css_debt(existing: &mut Vec<CssDebtEntry>, incoming: CssDebtEntry) {
    if let Some(entry) = existing.iter_mut().find(|e| e.selector == incoming.selector) {
        entry.usages.extend(incoming.usages);
    } else {
        existing.push(incoming);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn finds_test_ids_and_dedups_across_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "src/Login.tsx",
            r#"<button data-testid="submit-btn">Sign in</button>"#,
        );
        write_file(
            dir.path(),
            "src/Other.tsx",
            r#"<input data-testid="submit-btn" /><div data-testid="email-field" />"#,
        );

        let options = ScanOptions::new(dir.path());
        let catalog = scan_source_tree(&options).unwrap();
        assert_eq!(catalog.test_ids.len(), 2);
        assert!(catalog.has_test_id("submit-btn"));
        assert!(catalog.has_test_id("email-field"));
    }

    #[test]
    fn records_css_debt_for_class_usage() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "src/Card.tsx",
            r#"<div className="card-header flagged">hi</div>"#,
        );

        let options = ScanOptions::new(dir.path());
        let catalog = scan_source_tree(&options).unwrap();
        assert!(!catalog.css_debt.is_empty());
    }

    #[test]
    fn excludes_node_modules_by_default() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "node_modules/pkg/index.js",
            r#"data-testid="should-not-appear""#,
        );

        let options = ScanOptions::new(dir.path());
        let catalog = scan_source_tree(&options).unwrap();
        assert!(catalog.test_ids.is_empty());
    }
}
