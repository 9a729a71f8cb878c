//! Value specs: tagged sources for `fill`/`select` primitive arguments.

use serde::{Deserialize, Serialize};

/// Source of a value bound into a `fill`/`select` primitive.
///
/// `Actor` and `TestData` reference ambient identifiers the runtime binds at
/// render or run time; they are not resolved at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueSpec {
    Literal { value: String },
    Actor { value: String },
    RunId,
    Generated { value: String },
    TestData { value: String },
}

impl ValueSpec {
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn is_ambient(&self) -> bool {
        matches!(self, ValueSpec::Actor { .. } | ValueSpec::TestData { .. })
    }
}
