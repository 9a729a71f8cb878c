//! The step-text → primitive dispatcher (spec.md §4.7).
//!
//! Strategies run in order — first match wins — mirroring SPEC_FULL.md §9's
//! guidance to express the waterfall as an ordered list of `try(text, ctx)`
//! strategies rather than one large function: hints → normalize → pattern →
//! LLKB → fuzzy → hints-only construction → blocked.

use waymark_types::{LocatorSpec, LocatorStrategy, PatternId, Primitive};

use crate::fuzzy_matcher::fuzzy_match;
use crate::glossary::Glossary;
use crate::hint_parser::{parse_hints, Hints};
use crate::pattern_catalog::{match_pattern, PatternRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Pattern,
    Llkb,
    Fuzzy,
    Hints,
    None,
}

/// A successful LLKB lookup, supplied by the caller (`waymark-llkb` depends
/// on `waymark-core`, not the reverse, so the mapper takes this through a
/// trait object rather than a direct dependency).
pub struct LlkbHit {
    pub pattern_id: PatternId,
    pub primitive: Primitive,
    pub confidence: f64,
}

pub trait LlkbLookup {
    fn match_llkb_pattern(&self, normalized_text: &str, min_confidence: f64) -> Option<LlkbHit>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapResult {
    pub primitive: Option<Primitive>,
    pub match_source: MatchSource,
    pub is_assertion: bool,
    pub llkb_pattern_id: Option<PatternId>,
    pub llkb_confidence: Option<f64>,
    pub message: Option<String>,
}

impl std::fmt::Debug for dyn LlkbLookup + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<llkb lookup>")
    }
}

pub const DEFAULT_MIN_LLKB_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_MIN_FUZZY_SIMILARITY: f64 = 0.85;

/// Runs the full waterfall for one step's source text.
pub fn map_step(
    text: &str,
    glossary: &Glossary,
    records: &[PatternRecord],
    llkb: Option<&dyn LlkbLookup>,
) -> MapResult {
    let parsed_hints = parse_hints(text);
    let normalized = glossary.normalize_step_text(&parsed_hints.clean_text);

    if let Some((_, primitive)) = match_pattern(records, &normalized) {
        let is_assertion = primitive.is_assertion();
        return MapResult {
            primitive: Some(primitive),
            match_source: MatchSource::Pattern,
            is_assertion,
            llkb_pattern_id: None,
            llkb_confidence: None,
            message: None,
        };
    }

    if let Some(llkb) = llkb {
        if let Some(hit) = llkb.match_llkb_pattern(&normalized, DEFAULT_MIN_LLKB_CONFIDENCE) {
            let is_assertion = hit.primitive.is_assertion();
            return MapResult {
                primitive: Some(hit.primitive),
                match_source: MatchSource::Llkb,
                is_assertion,
                llkb_pattern_id: Some(hit.pattern_id),
                llkb_confidence: Some(hit.confidence),
                message: None,
            };
        }
    }

    if let Some(fuzzy) = fuzzy_match(&normalized, DEFAULT_MIN_FUZZY_SIMILARITY) {
        if let Some(primitive) = fuzzy.synthesized {
            let is_assertion = primitive.is_assertion();
            return MapResult {
                primitive: Some(primitive),
                match_source: MatchSource::Fuzzy,
                is_assertion,
                llkb_pattern_id: None,
                llkb_confidence: None,
                message: Some(format!(
                    "matched via fuzzy similarity {:.2} against pattern {}",
                    fuzzy.similarity, fuzzy.pattern_name
                )),
            };
        }
    }

    if let Some(primitive) = synthesize_from_hints(&parsed_hints.hints) {
        let is_assertion = primitive.is_assertion();
        return MapResult {
            primitive: Some(primitive),
            match_source: MatchSource::Hints,
            is_assertion,
            llkb_pattern_id: None,
            llkb_confidence: None,
            message: None,
        };
    }

    MapResult {
        primitive: None,
        match_source: MatchSource::None,
        is_assertion: false,
        llkb_pattern_id: None,
        llkb_confidence: None,
        message: Some(format!("no strategy could compile step text: {text:?}")),
    }
}

fn locator_from_hints(hints: &Hints) -> Option<LocatorSpec> {
    if let Some(testid) = &hints.testid {
        return Some(LocatorSpec::new(LocatorStrategy::TestId, testid.clone()));
    }
    if let Some(role) = &hints.role {
        return Some(LocatorSpec::role(role.clone(), hints.label.clone()));
    }
    if let Some(label) = &hints.label {
        return Some(LocatorSpec::new(LocatorStrategy::Label, label.clone()));
    }
    if let Some(text) = &hints.text {
        return Some(LocatorSpec::new(LocatorStrategy::Text, text.clone()));
    }
    None
}

/// Synthesize a primitive purely from hint-supplied locator fields when no
/// other strategy matched. Verb defaults to `click` since that is the most
/// common author intent behind a bare locator hint with no recognized verb.
fn synthesize_from_hints(hints: &Hints) -> Option<Primitive> {
    let locator = locator_from_hints(hints)?;
    Some(Primitive::Click { locator })
}
