//! Synonym, label-alias, and module-binding lookups (spec.md §4.2).

use std::collections::HashMap;

use regex::Regex;
use serde::Deserialize;

const DEFAULT_GLOSSARY_YAML: &str = include_str!("../assets/default_glossary.yaml");

#[derive(Debug, Clone, Deserialize, Default)]
struct GlossaryDocument {
    #[serde(default)]
    synonyms: HashMap<String, String>,
    #[serde(default)]
    label_aliases: HashMap<String, String>,
    #[serde(default)]
    module_bindings: HashMap<String, (String, String)>,
}

/// A resolved module/method binding for a `callModule` primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleBinding {
    pub module: String,
    pub method: String,
}

/// The merged synonym/alias/binding tables, built once per [`Glossary`].
pub struct Glossary {
    synonyms: HashMap<String, String>,
    label_aliases: HashMap<String, String>,
    module_bindings: HashMap<String, ModuleBinding>,
}

impl Glossary {
    /// The compile-time default glossary, with no extension applied.
    #[must_use]
    pub fn default_only() -> Self {
        Self::from_documents(parse_document(DEFAULT_GLOSSARY_YAML), None)
    }

    /// The default glossary deep-merged with a caller-supplied extension,
    /// core terms always winning on key collision.
    #[must_use]
    pub fn with_extension(extension_yaml: &str) -> Self {
        Self::from_documents(parse_document(DEFAULT_GLOSSARY_YAML), Some(parse_document(extension_yaml)))
    }

    fn from_documents(core: GlossaryDocument, extended: Option<GlossaryDocument>) -> Self {
        let mut synonyms = core.synonyms;
        let mut label_aliases = core.label_aliases;
        let mut module_bindings: HashMap<String, ModuleBinding> = core
            .module_bindings
            .into_iter()
            .map(|(k, (module, method))| (k, ModuleBinding { module, method }))
            .collect();

        if let Some(extended) = extended {
            for (key, value) in extended.synonyms {
                synonyms.entry(key).or_insert(value);
            }
            for (key, value) in extended.label_aliases {
                label_aliases.entry(key).or_insert(value);
            }
            for (key, (module, method)) in extended.module_bindings {
                module_bindings
                    .entry(key)
                    .or_insert(ModuleBinding { module, method });
            }
        }

        Self {
            synonyms,
            label_aliases,
            module_bindings,
        }
    }

    fn quoted_span_re() -> Regex {
        Regex::new(r#""[^"]*"|'[^']*'"#).expect("valid regex")
    }

    /// Replace every non-quoted token with its canonical synonym, leaving
    /// quoted substrings verbatim.
    #[must_use]
    pub fn normalize_step_text(&self, text: &str) -> String {
        let re = Self::quoted_span_re();
        let mut result = String::with_capacity(text.len());
        let mut last_end = 0;

        for m in re.find_iter(text) {
            result.push_str(&self.normalize_segment(&text[last_end..m.start()]));
            result.push_str(m.as_str());
            last_end = m.end();
        }
        result.push_str(&self.normalize_segment(&text[last_end..]));

        result
    }

    fn normalize_segment(&self, segment: &str) -> String {
        if segment.is_empty() {
            return String::new();
        }
        let lower = segment.to_ascii_lowercase();
        let mut longest: Option<(&str, &str)> = None;
        for (phrase, canonical) in &self.synonyms {
            if lower.contains(phrase.as_str())
                && longest.is_none_or(|(best, _)| phrase.len() > best.len())
            {
                longest = Some((phrase.as_str(), canonical.as_str()));
            }
        }
        match longest {
            Some((phrase, canonical)) => {
                let byte_pos = lower.find(phrase).expect("phrase located by contains");
                let mut out = String::with_capacity(segment.len());
                out.push_str(&segment[..byte_pos]);
                out.push_str(canonical);
                out.push_str(&segment[byte_pos + phrase.len()..]);
                out
            }
            None => segment.to_string(),
        }
    }

    #[must_use]
    pub fn find_label_alias(&self, label: &str) -> Option<&str> {
        self.label_aliases
            .get(&label.to_ascii_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn resolve_module_method(&self, phrase: &str) -> Option<&ModuleBinding> {
        self.module_bindings.get(&phrase.to_ascii_lowercase())
    }

    /// Treated as a pattern hit of type `callModule` when found (spec.md §4.7).
    #[must_use]
    pub fn lookup_glossary(&self, text: &str) -> Option<&ModuleBinding> {
        let lower = text.to_ascii_lowercase();
        self.module_bindings
            .iter()
            .find(|(phrase, _)| lower.contains(phrase.as_str()))
            .map(|(_, binding)| binding)
    }
}

fn parse_document(yaml: &str) -> GlossaryDocument {
    serde_yaml::from_str(yaml).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_glossary_parses_without_error() {
        let glossary = Glossary::default_only();
        assert!(glossary.find_label_alias("sign in").is_some());
    }

    #[test]
    fn normalize_preserves_quoted_text() {
        let glossary = Glossary::default_only();
        let normalized = glossary.normalize_step_text(r#"Navigate to "the home page""#);
        assert!(normalized.contains(r#""the home page""#));
        assert!(normalized.starts_with("go"));
    }

    #[test]
    fn extended_entries_do_not_override_core_terms() {
        let extension = "synonyms:\n  navigate: overridden\n";
        let glossary = Glossary::with_extension(extension);
        let normalized = glossary.normalize_step_text("Navigate to dashboard");
        assert!(normalized.starts_with("go"));
        assert!(!normalized.starts_with("overridden"));
    }

    #[test]
    fn extended_entries_fill_gaps() {
        let extension = "module_bindings:\n  archive the order: [orders, archive]\n";
        let glossary = Glossary::with_extension(extension);
        let binding = glossary
            .resolve_module_method("archive the order")
            .expect("extension binding should fill the gap");
        assert_eq!(binding.module, "orders");
        assert_eq!(binding.method, "archive");
    }

    #[test]
    fn lookup_glossary_matches_module_binding_phrase() {
        let glossary = Glossary::default_only();
        let binding = glossary.lookup_glossary("Seed a user before the test").expect("binding found");
        assert_eq!(binding.module, "users");
        assert_eq!(binding.method, "seedUser");
    }
}
