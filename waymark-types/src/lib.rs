//! Core IR, locator, and learned-pattern domain types for Waymark.
//!
//! No IO, no async: every type here is pure data, serializable with `serde`,
//! shared by every other crate in the workspace. This is the vocabulary the
//! parser, mapper, catalog, LLKB, codegen, and pipeline crates all speak.

mod completion;
mod errors;
mod ids;
mod journey;
mod learned_pattern;
mod locator;
mod pipeline_state;
mod primitive;
pub mod runner;
mod selector_catalog;
mod value;
mod variant;

pub use completion::{CompletionSignal, CompletionSignalOptions, CompletionSignalType, ElementState};
pub use errors::{CodedError, ErrorCode};
pub use ids::{InvalidJourneyId, JourneyId, PatternId, StepId};
pub use journey::{
    CleanupPolicy, DataPolicy, DataStrategy, Journey, ModuleDependencies, PerformanceBudget, Step,
    TestDataSet, Tier,
};
pub use learned_pattern::{wilson_lower_bound, LearnedPattern};
pub use locator::{LocatorOptions, LocatorSpec, LocatorStrategy};
pub use pipeline_state::{PipelineStage, PipelineState};
pub use primitive::{Primitive, ToastType};
pub use selector_catalog::{
    ComponentEntry, CssDebtEntry, CssDebtPriority, CssUsage, PageEntry, SelectorCatalog, SelectorEntry,
};
pub use value::ValueSpec;
pub use variant::{FeatureAvailability, Variant};
