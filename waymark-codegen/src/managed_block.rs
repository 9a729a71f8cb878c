//! Managed-block extraction and re-injection (spec.md §4.11).
//!
//! A managed region runs from a `BEGIN GENERATED [id=X]?` marker to the next
//! `END GENERATED` marker. Regeneration with the `blocks` strategy rewrites
//! only these regions and must reproduce every other byte of the file
//! unchanged (spec.md §8's managed-region-preservation invariant).

use std::collections::VecDeque;

use regex::Regex;

/// One managed region's content, keyed by an optional author-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedBlock {
    pub id: Option<String>,
    pub content: String,
}

impl ManagedBlock {
    #[must_use]
    pub fn new(id: Option<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Preserved(String),
    Managed {
        id: Option<String>,
        begin_marker: String,
        end_marker: String,
        content: String,
    },
}

/// The extracted structure of a file, ready for [`inject`].
#[derive(Debug, Clone)]
pub struct ExtractResult {
    segments: Vec<Segment>,
    pub blocks: Vec<ManagedBlock>,
    pub warnings: Vec<String>,
    trailing_newline: bool,
}

fn begin_regex() -> Regex {
    Regex::new(r"BEGIN GENERATED(?:\s*\[id=([^\]]+)\])?").expect("static begin marker pattern compiles")
}

fn end_regex() -> Regex {
    Regex::new(r"END GENERATED").expect("static end marker pattern compiles")
}

/// Splits `content` into preserved and managed segments per the BEGIN/END
/// marker rules (nested BEGIN closes the prior region with a warning;
/// an unclosed region at EOF is discarded with a warning).
#[must_use]
pub fn extract(content: &str) -> ExtractResult {
    let begin_re = begin_regex();
    let end_re = end_regex();

    let mut segments = Vec::new();
    let mut blocks = Vec::new();
    let mut warnings = Vec::new();

    let mut preserved_buf: Vec<&str> = Vec::new();
    let mut open: Option<(Option<String>, String, usize, Vec<&str>)> = None;

    for (line_no, line) in content.lines().enumerate() {
        if let Some(caps) = begin_re.captures(line) {
            if let Some((id, begin_marker, start_line, buf)) = open.take() {
                warnings.push(format!(
                    "nested managed block at line {} closed without END (opened at line {})",
                    line_no + 1,
                    start_line + 1
                ));
                let joined = buf.join("\n");
                blocks.push(ManagedBlock::new(id.clone(), joined.clone()));
                segments.push(Segment::Managed {
                    id,
                    begin_marker,
                    end_marker: String::new(),
                    content: joined,
                });
            } else {
                segments.push(Segment::Preserved(preserved_buf.join("\n")));
                preserved_buf.clear();
            }
            let id = caps.get(1).map(|m| m.as_str().trim().to_string());
            open = Some((id, line.to_string(), line_no, Vec::new()));
            continue;
        }

        if end_re.is_match(line) {
            if let Some((id, begin_marker, _start_line, buf)) = open.take() {
                let joined = buf.join("\n");
                blocks.push(ManagedBlock::new(id.clone(), joined.clone()));
                segments.push(Segment::Managed {
                    id,
                    begin_marker,
                    end_marker: line.to_string(),
                    content: joined,
                });
                continue;
            }
            preserved_buf.push(line);
            continue;
        }

        match &mut open {
            Some((_, _, _, buf)) => buf.push(line),
            None => preserved_buf.push(line),
        }
    }

    if let Some((_, _, start_line, _)) = open {
        warnings.push(format!(
            "unclosed managed block opened at line {} discarded at EOF",
            start_line + 1
        ));
    } else {
        segments.push(Segment::Preserved(preserved_buf.join("\n")));
    }

    ExtractResult {
        segments,
        blocks,
        warnings,
        trailing_newline: content.ends_with('\n'),
    }
}

/// Replaces managed-region content with `new_blocks`, matched by `id` first
/// and then by positional order among the remaining id-less blocks on both
/// sides. New blocks with no matching existing region are appended at EOF.
#[must_use]
pub fn inject(extracted: &ExtractResult, new_blocks: &[ManagedBlock]) -> (String, Vec<String>) {
    let mut warnings = extracted.warnings.clone();

    let mut by_id: std::collections::HashMap<&str, &ManagedBlock> = std::collections::HashMap::new();
    let mut positional: VecDeque<&ManagedBlock> = VecDeque::new();
    let mut consumed_ids: std::collections::HashSet<&str> = std::collections::HashSet::new();

    for block in new_blocks {
        match &block.id {
            Some(id) => {
                by_id.insert(id.as_str(), block);
            }
            None => positional.push_back(block),
        }
    }

    let mut out = String::new();
    let mut first = true;
    for segment in &extracted.segments {
        if !first {
            out.push('\n');
        }
        first = false;
        match segment {
            Segment::Preserved(text) => out.push_str(text),
            Segment::Managed {
                id,
                begin_marker,
                end_marker,
                content,
            } => {
                let replacement = id
                    .as_deref()
                    .and_then(|existing_id| {
                        by_id.get(existing_id).inspect(|_| {
                            consumed_ids.insert(existing_id);
                        })
                    })
                    .copied()
                    .or_else(|| if id.is_none() { positional.pop_front() } else { None });

                out.push_str(begin_marker);
                out.push('\n');
                match replacement {
                    Some(block) => out.push_str(&block.content),
                    None => out.push_str(content),
                }
                if !end_marker.is_empty() {
                    out.push('\n');
                    out.push_str(end_marker);
                }
            }
        }
    }

    let leftover: Vec<&ManagedBlock> = new_blocks
        .iter()
        .filter(|b| match &b.id {
            Some(id) => !consumed_ids.contains(id.as_str()),
            None => false,
        })
        .chain(positional.iter().copied())
        .collect();

    for block in leftover {
        out.push('\n');
        match &block.id {
            Some(id) => out.push_str(&format!("// BEGIN GENERATED [id={id}]\n")),
            None => out.push_str("// BEGIN GENERATED\n"),
        }
        out.push_str(&block.content);
        out.push_str("\n// END GENERATED");
        warnings.push(format!(
            "new block {} had no matching existing region; appended at EOF",
            block.id.as_deref().unwrap_or("<positional>")
        ));
    }

    if extracted.trailing_newline {
        out.push('\n');
    }

    (out, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_replaces_id_and_positional_blocks_leaving_user_code_untouched() {
        let original = "const a = 1;\n// BEGIN GENERATED [id=setup]\nold setup\n// END GENERATED\nconst b = 2;\n// BEGIN GENERATED\nold positional\n// END GENERATED\n";
        let extracted = extract(original);
        assert_eq!(extracted.blocks.len(), 2);

        let new_blocks = vec![
            ManagedBlock::new(Some("setup".to_string()), "new setup"),
            ManagedBlock::new(None, "new positional"),
        ];
        let (output, warnings) = inject(&extracted, &new_blocks);

        assert!(output.contains("const a = 1;"));
        assert!(output.contains("const b = 2;"));
        assert!(output.contains("new setup"));
        assert!(output.contains("new positional"));
        assert!(!output.contains("old setup"));
        assert!(!output.contains("old positional"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn nested_begin_raises_a_warning() {
        let content = "// BEGIN GENERATED [id=a]\ninner\n// BEGIN GENERATED [id=b]\nother\n// END GENERATED\n";
        let extracted = extract(content);
        assert!(extracted.warnings.iter().any(|w| w.contains("nested")));
        assert_eq!(extracted.blocks.len(), 2);
    }

    #[test]
    fn unclosed_region_is_discarded_with_a_warning() {
        let content = "keep me\n// BEGIN GENERATED [id=x]\nnever closed\n";
        let extracted = extract(content);
        assert!(extracted.warnings.iter().any(|w| w.contains("unclosed")));
        assert!(extracted.blocks.is_empty());
    }

    #[test]
    fn unmatched_new_block_is_appended_not_dropped() {
        let original = "// BEGIN GENERATED [id=setup]\nold\n// END GENERATED\n";
        let extracted = extract(original);
        let new_blocks = vec![
            ManagedBlock::new(Some("setup".to_string()), "new"),
            ManagedBlock::new(Some("extra".to_string()), "brand new block"),
        ];
        let (output, warnings) = inject(&extracted, &new_blocks);
        assert!(output.contains("brand new block"));
        assert!(warnings.iter().any(|w| w.contains("extra")));
    }
}
