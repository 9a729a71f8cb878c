//! The canonical IR unit: `Journey`, `Step`, and their supporting enums.

use serde::{Deserialize, Serialize};

use crate::completion::CompletionSignal;
use crate::ids::{JourneyId, StepId};
use crate::primitive::Primitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Smoke,
    Release,
    Regression,
}

impl Tier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Smoke => "smoke",
            Tier::Release => "release",
            Tier::Regression => "regression",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStrategy {
    Seed,
    Create,
    Reuse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleanupPolicy {
    Required,
    BestEffort,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPolicy {
    pub strategy: DataStrategy,
    pub cleanup: CleanupPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleDependencies {
    #[serde(default)]
    pub foundation: Vec<String>,
    #[serde(default)]
    pub feature: Vec<String>,
}

/// One acceptance criterion / procedural step, compiled to ordered primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub description: String,
    pub actions: Vec<Primitive>,
    pub assertions: Vec<Primitive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Step {
    #[must_use]
    pub fn new(id: StepId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            actions: Vec::new(),
            assertions: Vec::new(),
            source_text: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn has_blocked(&self) -> bool {
        self.actions.iter().chain(&self.assertions).any(Primitive::is_blocked)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestDataSet {
    pub name: String,
    pub rows: Vec<std::collections::BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceBudget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_load_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_interaction_ms: Option<u32>,
}

/// The canonical IR unit compiled from one Journey document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    pub id: JourneyId,
    pub title: String,
    pub tier: Tier,
    pub scope: String,
    pub actor: String,
    pub revision: u32,

    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub module_dependencies: ModuleDependencies,

    pub data: DataPolicy,

    pub completion: Vec<CompletionSignal>,
    pub steps: Vec<Step>,

    #[serde(default)]
    pub setup: Vec<Primitive>,
    #[serde(default)]
    pub cleanup: Vec<Primitive>,
    #[serde(default)]
    pub prerequisites: Vec<JourneyId>,
    #[serde(default)]
    pub negative_paths: Vec<Step>,
    #[serde(default)]
    pub test_data: Vec<TestDataSet>,
    #[serde(default)]
    pub visual_regression: bool,
    #[serde(default)]
    pub accessibility: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceBudget>,
}

impl Journey {
    #[must_use]
    pub fn has_any_blocked(&self) -> bool {
        self.steps.iter().any(Step::has_blocked)
    }

    /// Standard tags every normalized journey must contain (spec.md §8 invariant).
    #[must_use]
    pub fn expected_standard_tags(&self) -> Vec<String> {
        vec![
            "@artk".to_string(),
            "@journey".to_string(),
            format!("@{}", self.id),
            format!("@tier-{}", self.tier.as_str()),
            format!("@scope-{}", self.scope),
            format!("@actor-{}", self.actor),
        ]
    }
}
