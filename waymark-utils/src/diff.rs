//! Unified diff formatting and stats, used by managed-block merge verification.

use std::fmt::Write as _;
use std::str;

use similar::{ChangeTag, TextDiff};

/// Format a unified diff between old and new file content, one line of
/// context around each change and a `...` marker between distant hunks.
#[must_use]
pub fn format_unified_diff(old_text: &str, new_text: &str) -> String {
    let diff = TextDiff::from_lines(old_text, new_text);
    let changes: Vec<_> = diff.iter_all_changes().collect();
    if changes.is_empty() {
        return String::new();
    }

    let max_line = old_text.lines().count().max(new_text.lines().count());
    let width = if max_line == 0 {
        1
    } else {
        ((max_line as f64).log10().floor() as usize) + 1
    };
    let gap_marker = format!("{:>width$}\n", "...");

    let mut out = String::new();
    let mut last_output_idx: Option<usize> = None;

    for (i, change) in changes.iter().enumerate() {
        let (marker, line_no) = match change.tag() {
            ChangeTag::Equal => {
                let near_prev = i > 0 && changes[i - 1].tag() != ChangeTag::Equal;
                let near_next = changes.get(i + 1).is_some_and(|c| c.tag() != ChangeTag::Equal);
                if !near_prev && !near_next {
                    continue;
                }
                (' ', change.old_index().expect("equal change has old_index") + 1)
            }
            ChangeTag::Delete => ('-', change.old_index().expect("delete change has old_index") + 1),
            ChangeTag::Insert => ('+', change.new_index().expect("insert change has new_index") + 1),
        };

        if let Some(last_idx) = last_output_idx {
            if i - last_idx > 3 {
                out.push_str(&gap_marker);
            }
        }
        write!(out, "{line_no:>width$} {marker}").expect("writing to String never fails");
        out.push_str(change.value().trim_end_matches('\n'));
        out.push('\n');
        last_output_idx = Some(i);
    }

    out
}

/// `(additions, deletions)` between old and new content.
#[must_use]
pub fn compute_diff_stats(old_text: &str, new_text: &str) -> (u32, u32) {
    let diff = TextDiff::from_lines(old_text, new_text);
    let mut additions = 0;
    let mut deletions = 0;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => additions += 1,
            ChangeTag::Delete => deletions += 1,
            ChangeTag::Equal => {}
        }
    }
    (additions, deletions)
}

/// `true` when old and new content are byte-identical once trailing
/// whitespace is normalized — used to skip a no-op managed-block rewrite.
#[must_use]
pub fn is_effectively_unchanged(old_text: &str, new_text: &str) -> bool {
    old_text.trim_end() == new_text.trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_produces_empty_diff() {
        assert_eq!(format_unified_diff("a\nb\n", "a\nb\n"), "");
    }

    #[test]
    fn stats_count_additions_and_deletions() {
        let (add, del) = compute_diff_stats("a\nb\nc\n", "a\nx\nc\n");
        assert_eq!((add, del), (1, 1));
    }

    #[test]
    fn unchanged_ignores_trailing_whitespace() {
        assert!(is_effectively_unchanged("a\nb\n", "a\nb"));
        assert!(!is_effectively_unchanged("a\nb\n", "a\nc\n"));
    }
}
