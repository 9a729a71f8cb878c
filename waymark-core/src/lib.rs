//! Journey parsing, glossary normalization, pattern/fuzzy/LLKB step mapping,
//! and IR lowering.

mod errors;
pub mod fuzzy_matcher;
pub mod glossary;
pub mod hint_parser;
pub mod journey_parser;
pub mod normalizer;
pub mod pattern_catalog;
pub mod step_mapper;

pub use errors::ParseError;
pub use fuzzy_matcher::{fuzzy_match, FuzzyExample, FuzzyMatch};
pub use glossary::{Glossary, ModuleBinding};
pub use hint_parser::{parse_hints, Hints, ParsedHints};
pub use journey_parser::{
    parse, parse_content, try_parse_content, AcceptanceCriterion, JourneyFrontmatter,
    ParsedJourney, ProceduralStep,
};
pub use normalizer::normalize_journey;
pub use pattern_catalog::{catalog, match_pattern, PatternRecord, PATTERN_VERSION};
pub use step_mapper::{map_step, LlkbHit, LlkbLookup, MapResult, MatchSource};
