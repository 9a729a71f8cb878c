//! The IR primitive: one leaf action or assertion, one per renderer statement.
//!
//! Modeled as a single exhaustive enum per SPEC_FULL.md §9's guidance ("the
//! IR is a large tagged sum; model it as a sealed variant with exhaustive
//! pattern matching in the renderer"). Adding a verb means adding a variant
//! and a match arm in the renderer — additive, not invasive.

use serde::{Deserialize, Serialize};

use crate::locator::LocatorSpec;
use crate::value::ValueSpec;

/// Toast/notification subtype, inferred from completion-signal message keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastType {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Primitive {
    // --- Navigation / wait ---
    Goto {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wait_for_load: Option<bool>,
    },
    Reload,
    GoBack,
    GoForward,
    WaitForUrl {
        pattern: String,
    },
    WaitForResponse {
        url_pattern: String,
    },
    WaitForLoadingComplete,
    WaitForVisible {
        locator: LocatorSpec,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u32>,
    },
    WaitForHidden {
        locator: LocatorSpec,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u32>,
    },
    WaitForTimeout {
        ms: u32,
    },
    WaitForNetworkIdle {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u32>,
    },

    // --- Interaction ---
    Click {
        locator: LocatorSpec,
    },
    DblClick {
        locator: LocatorSpec,
    },
    RightClick {
        locator: LocatorSpec,
    },
    Hover {
        locator: LocatorSpec,
    },
    Focus {
        locator: LocatorSpec,
    },
    Clear {
        locator: LocatorSpec,
    },
    Fill {
        locator: LocatorSpec,
        value: ValueSpec,
    },
    Select {
        locator: LocatorSpec,
        option: ValueSpec,
    },
    Check {
        locator: LocatorSpec,
    },
    Uncheck {
        locator: LocatorSpec,
    },
    Press {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        locator: Option<LocatorSpec>,
    },
    Upload {
        locator: LocatorSpec,
        files: Vec<String>,
    },
    CallModule {
        module: String,
        method: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
    },

    // --- Assertions (type begins with `expect`) ---
    ExpectVisible {
        locator: LocatorSpec,
    },
    ExpectNotVisible {
        locator: LocatorSpec,
    },
    ExpectHidden {
        locator: LocatorSpec,
    },
    ExpectEnabled {
        locator: LocatorSpec,
    },
    ExpectDisabled {
        locator: LocatorSpec,
    },
    ExpectChecked {
        locator: LocatorSpec,
    },
    ExpectText {
        locator: LocatorSpec,
        text: String,
    },
    ExpectValue {
        locator: LocatorSpec,
        value: String,
    },
    ExpectContainsText {
        locator: LocatorSpec,
        text: String,
    },
    ExpectCount {
        locator: LocatorSpec,
        count: u32,
    },
    ExpectUrl {
        pattern: String,
    },
    ExpectTitle {
        title: String,
    },
    ExpectToast {
        toast_type: ToastType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    // --- Terminal ---
    /// A step the mapper could not compile. Generated code must throw.
    Blocked {
        reason: String,
        source_text: String,
    },
}

impl Primitive {
    /// True for every `expect*` variant, per spec.md §3's "prefix `expect`" rule.
    #[must_use]
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            Primitive::ExpectVisible { .. }
                | Primitive::ExpectNotVisible { .. }
                | Primitive::ExpectHidden { .. }
                | Primitive::ExpectEnabled { .. }
                | Primitive::ExpectDisabled { .. }
                | Primitive::ExpectChecked { .. }
                | Primitive::ExpectText { .. }
                | Primitive::ExpectValue { .. }
                | Primitive::ExpectContainsText { .. }
                | Primitive::ExpectCount { .. }
                | Primitive::ExpectUrl { .. }
                | Primitive::ExpectTitle { .. }
                | Primitive::ExpectToast { .. }
        )
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Primitive::Blocked { .. })
    }

    /// The locator this primitive operates on, if any.
    #[must_use]
    pub fn locator(&self) -> Option<&LocatorSpec> {
        match self {
            Primitive::WaitForVisible { locator, .. }
            | Primitive::WaitForHidden { locator, .. }
            | Primitive::Click { locator }
            | Primitive::DblClick { locator }
            | Primitive::RightClick { locator }
            | Primitive::Hover { locator }
            | Primitive::Focus { locator }
            | Primitive::Clear { locator }
            | Primitive::Fill { locator, .. }
            | Primitive::Select { locator, .. }
            | Primitive::Check { locator }
            | Primitive::Uncheck { locator }
            | Primitive::Upload { locator, .. }
            | Primitive::ExpectVisible { locator }
            | Primitive::ExpectNotVisible { locator }
            | Primitive::ExpectHidden { locator }
            | Primitive::ExpectEnabled { locator }
            | Primitive::ExpectDisabled { locator }
            | Primitive::ExpectChecked { locator }
            | Primitive::ExpectText { locator, .. }
            | Primitive::ExpectValue { locator, .. }
            | Primitive::ExpectContainsText { locator, .. }
            | Primitive::ExpectCount { locator, .. } => Some(locator),
            Primitive::Press { locator, .. } => locator.as_ref(),
            _ => None,
        }
    }

    /// Stable kind string, used for provenance reporting and healing-rule applicability.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Goto { .. } => "goto",
            Primitive::Reload => "reload",
            Primitive::GoBack => "goBack",
            Primitive::GoForward => "goForward",
            Primitive::WaitForUrl { .. } => "waitForURL",
            Primitive::WaitForResponse { .. } => "waitForResponse",
            Primitive::WaitForLoadingComplete => "waitForLoadingComplete",
            Primitive::WaitForVisible { .. } => "waitForVisible",
            Primitive::WaitForHidden { .. } => "waitForHidden",
            Primitive::WaitForTimeout { .. } => "waitForTimeout",
            Primitive::WaitForNetworkIdle { .. } => "waitForNetworkIdle",
            Primitive::Click { .. } => "click",
            Primitive::DblClick { .. } => "dblclick",
            Primitive::RightClick { .. } => "rightClick",
            Primitive::Hover { .. } => "hover",
            Primitive::Focus { .. } => "focus",
            Primitive::Clear { .. } => "clear",
            Primitive::Fill { .. } => "fill",
            Primitive::Select { .. } => "select",
            Primitive::Check { .. } => "check",
            Primitive::Uncheck { .. } => "uncheck",
            Primitive::Press { .. } => "press",
            Primitive::Upload { .. } => "upload",
            Primitive::CallModule { .. } => "callModule",
            Primitive::ExpectVisible { .. } => "expectVisible",
            Primitive::ExpectNotVisible { .. } => "expectNotVisible",
            Primitive::ExpectHidden { .. } => "expectHidden",
            Primitive::ExpectEnabled { .. } => "expectEnabled",
            Primitive::ExpectDisabled { .. } => "expectDisabled",
            Primitive::ExpectChecked { .. } => "expectChecked",
            Primitive::ExpectText { .. } => "expectText",
            Primitive::ExpectValue { .. } => "expectValue",
            Primitive::ExpectContainsText { .. } => "expectContainsText",
            Primitive::ExpectCount { .. } => "expectCount",
            Primitive::ExpectUrl { .. } => "expectURL",
            Primitive::ExpectTitle { .. } => "expectTitle",
            Primitive::ExpectToast { .. } => "expectToast",
            Primitive::Blocked { .. } => "blocked",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::LocatorStrategy;

    #[test]
    fn expect_variants_are_assertions() {
        let p = Primitive::ExpectVisible {
            locator: LocatorSpec::new(LocatorStrategy::Text, "Welcome"),
        };
        assert!(p.is_assertion());
    }

    #[test]
    fn click_is_not_an_assertion() {
        let p = Primitive::Click {
            locator: LocatorSpec::new(LocatorStrategy::Role, "button"),
        };
        assert!(!p.is_assertion());
    }

    #[test]
    fn blocked_is_terminal() {
        let p = Primitive::Blocked {
            reason: "no mapping".into(),
            source_text: "Do the thing".into(),
        };
        assert!(p.is_blocked());
        assert!(!p.is_assertion());
    }

    #[test]
    fn locator_extraction_covers_fill() {
        let p = Primitive::Fill {
            locator: LocatorSpec::new(LocatorStrategy::Label, "Email"),
            value: ValueSpec::literal("a@b.com"),
        };
        assert!(p.locator().is_some());
    }
}
