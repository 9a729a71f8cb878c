//! Completion signals: author-declared success conditions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionSignalType {
    Url,
    Toast,
    Element,
    Text,
    Title,
    Api,
}

/// Expected presence/absence of an `element`/`text` completion signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementState {
    #[default]
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionSignalOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,
    #[serde(default)]
    pub state: ElementState,
}

/// `{type, value, options?}` — the normalizer translates each of these into
/// exactly one IR assertion primitive (spec.md §4.8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSignal {
    #[serde(rename = "type")]
    pub signal_type: CompletionSignalType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CompletionSignalOptions>,
}

impl CompletionSignal {
    #[must_use]
    pub fn url(value: impl Into<String>) -> Self {
        Self {
            signal_type: CompletionSignalType::Url,
            value: value.into(),
            options: None,
        }
    }
}
