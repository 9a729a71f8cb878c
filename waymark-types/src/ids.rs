//! Validated newtype identifiers.
//!
//! Mirrors the reference workspace's `MessageId`/`StepId`/`ToolBatchId`
//! pattern: a thin wrapper that makes the identifier's shape a compile-time
//! guarantee rather than a convention callers have to remember.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("journey id {0:?} does not match JRN-#### (four digits)")]
pub struct InvalidJourneyId(pub String);

/// A Journey identifier, always of the form `JRN-####`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JourneyId(String);

impl JourneyId {
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidJourneyId> {
        let raw = raw.into();
        if is_valid_journey_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(InvalidJourneyId(raw))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_journey_id(raw: &str) -> bool {
    let Some(digits) = raw.strip_prefix("JRN-") else {
        return false;
    };
    digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit())
}

impl TryFrom<String> for JourneyId {
    type Error = InvalidJourneyId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JourneyId> for String {
    fn from(value: JourneyId) -> Self {
        value.0
    }
}

impl fmt::Display for JourneyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an IR step within a journey, stable across regenerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StepId(u32);

impl StepId {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a learned pattern in the LLKB store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PatternId(String);

impl PatternId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journey_id_accepts_four_digits() {
        assert!(JourneyId::new("JRN-0001").is_ok());
    }

    #[test]
    fn journey_id_rejects_bad_shapes() {
        assert!(JourneyId::new("JRN-1").is_err());
        assert!(JourneyId::new("JRN-00001").is_err());
        assert!(JourneyId::new("jrn-0001").is_err());
        assert!(JourneyId::new("JRN-abcd").is_err());
    }

    #[test]
    fn step_id_roundtrips_value() {
        let id = StepId::new(7);
        assert_eq!(id.value(), 7);
    }
}
