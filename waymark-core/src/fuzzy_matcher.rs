//! Last-chance matcher before a step is declared `blocked` (spec.md §4.5).
//!
//! Each pattern carries a hand-authored list of canonical example
//! utterances. `fuzzy_match` scores the input against every example with a
//! token-Jaccard similarity, tie-broken by Damerau-Levenshtein distance, and
//! returns the best-scoring pattern at or above `min_similarity`.

use std::collections::HashSet;

use waymark_types::{LocatorSpec, LocatorStrategy, Primitive};

pub struct FuzzyExample {
    pub pattern_name: &'static str,
    pub primitive_type: &'static str,
    pub utterance: &'static str,
}

#[must_use]
pub fn canonical_examples() -> Vec<FuzzyExample> {
    vec![
        FuzzyExample { pattern_name: "click-quoted", primitive_type: "click", utterance: "click the submit button" },
        FuzzyExample { pattern_name: "click-quoted", primitive_type: "click", utterance: "press the sign in button" },
        FuzzyExample { pattern_name: "fill-field-with-value", primitive_type: "fill", utterance: "fill the email field with a value" },
        FuzzyExample { pattern_name: "fill-field-with-value", primitive_type: "fill", utterance: "type text into the search box" },
        FuzzyExample { pattern_name: "expect-visible-quoted", primitive_type: "expectVisible", utterance: "user sees a confirmation message" },
        FuzzyExample { pattern_name: "expect-visible-quoted", primitive_type: "expectVisible", utterance: "the welcome banner is visible" },
        FuzzyExample { pattern_name: "hover-quoted", primitive_type: "hover", utterance: "hover over the tooltip icon" },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub pattern_name: &'static str,
    pub primitive_type: &'static str,
    pub similarity: f64,
    /// Populated only when similarity is high enough to synthesize a
    /// generic primitive without re-running the pattern's own regex.
    pub synthesized: Option<Primitive>,
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_ascii_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn token_jaccard(a: &str, b: &str) -> f64 {
    let ta = tokenize(a);
    let tb = tokenize(b);
    if ta.is_empty() && tb.is_empty() {
        return 1.0;
    }
    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn extract_quoted_or_noun_phrase(text: &str) -> Option<String> {
    if let Some(start) = text.find('"') {
        if let Some(end) = text[start + 1..].find('"') {
            return Some(text[start + 1..start + 1 + end].to_string());
        }
    }
    text.split_whitespace().last().map(str::to_string)
}

/// `fuzzyMatch(text, { minSimilarity = 0.85 })`.
#[must_use]
pub fn fuzzy_match(text: &str, min_similarity: f64) -> Option<FuzzyMatch> {
    let examples = canonical_examples();

    let mut best: Option<(&FuzzyExample, f64)> = None;
    for example in &examples {
        let jaccard = token_jaccard(text, example.utterance);
        let is_better = match best {
            None => true,
            Some((_, best_score)) => {
                jaccard > best_score
                    || ((jaccard - best_score).abs() < f64::EPSILON
                        && strsim::damerau_levenshtein(text, example.utterance)
                            < strsim::damerau_levenshtein(text, best.unwrap().0.utterance))
            }
        };
        if is_better {
            best = Some((example, jaccard));
        }
    }

    let (example, similarity) = best?;
    if similarity < min_similarity {
        return None;
    }

    let synthesized = if similarity >= 0.90 {
        synthesize_primitive(example.primitive_type, text)
    } else {
        None
    };

    Some(FuzzyMatch {
        pattern_name: example.pattern_name,
        primitive_type: example.primitive_type,
        similarity,
        synthesized,
    })
}

fn synthesize_primitive(primitive_type: &str, text: &str) -> Option<Primitive> {
    let target = extract_quoted_or_noun_phrase(text)?;
    match primitive_type {
        "click" => Some(Primitive::Click {
            locator: LocatorSpec::role("button", Some(target)),
        }),
        "hover" => Some(Primitive::Hover {
            locator: LocatorSpec::new(LocatorStrategy::Text, target),
        }),
        "expectVisible" => Some(Primitive::ExpectVisible {
            locator: LocatorSpec::new(LocatorStrategy::Text, target),
        }),
        _ => None,
    }
}
