//! Locator specs: strategy-parameterized references to UI elements.

use serde::{Deserialize, Serialize};

/// Locator strategy, ordered from most to least preferred by default policy.
///
/// `Css` is the strategy of last resort (spec.md §3 invariant) and may be
/// marked forbidden entirely by selector policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorStrategy {
    Role,
    Label,
    Placeholder,
    Text,
    TestId,
    Css,
}

impl LocatorStrategy {
    /// Default priority ordering: `role > label > placeholder > text > testid > css`.
    #[must_use]
    pub const fn default_priority_rank(self) -> u8 {
        match self {
            LocatorStrategy::Role => 0,
            LocatorStrategy::Label => 1,
            LocatorStrategy::Placeholder => 2,
            LocatorStrategy::Text => 3,
            LocatorStrategy::TestId => 4,
            LocatorStrategy::Css => 5,
        }
    }
}

/// Optional parameters accompanying a locator value (mainly meaningful for `Role`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocatorOptions {
    pub name: Option<String>,
    pub exact: Option<bool>,
    pub level: Option<u8>,
}

impl LocatorOptions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.exact.is_none() && self.level.is_none()
    }
}

/// A strategy-parameterized reference to a UI element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorSpec {
    pub strategy: LocatorStrategy,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<LocatorOptions>,
}

impl LocatorSpec {
    #[must_use]
    pub fn new(strategy: LocatorStrategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
            options: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: LocatorOptions) -> Self {
        self.options = if options.is_empty() {
            None
        } else {
            Some(options)
        };
        self
    }

    #[must_use]
    pub fn role(role: impl Into<String>, name: Option<String>) -> Self {
        let mut spec = Self::new(LocatorStrategy::Role, role);
        if let Some(name) = name {
            spec.options = Some(LocatorOptions {
                name: Some(name),
                exact: None,
                level: None,
            });
        }
        spec
    }

    #[must_use]
    pub fn test_id(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::TestId, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_rank_orders_role_above_css() {
        assert!(
            LocatorStrategy::Role.default_priority_rank()
                < LocatorStrategy::Css.default_priority_rank()
        );
    }

    #[test]
    fn options_normalize_to_none_when_empty() {
        let spec = LocatorSpec::new(LocatorStrategy::Text, "Welcome").with_options(
            LocatorOptions::default(),
        );
        assert!(spec.options.is_none());
    }
}
