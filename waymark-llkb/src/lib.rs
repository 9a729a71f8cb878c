//! Locally Learned Knowledge Base (LLKB): the persistent store of
//! step-text → primitive mappings the pipeline accumulates as it
//! successfully compiles and verifies journeys (spec.md §4.6).
//!
//! [`store::LlkbStore`] implements `waymark_core::step_mapper::LlkbLookup`,
//! so it plugs directly into the step-mapper waterfall without `waymark-core`
//! ever depending back on this crate.

pub mod errors;
pub mod store;

pub use errors::LlkbError;
pub use store::{LlkbStore, PruneOptions};
