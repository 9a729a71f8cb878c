//! Config loading: fixed search list, deep merge, version migration, and
//! `jsonschema` validation on top of static `serde` deserialization.

mod loader;
mod merge;
mod migrate;
mod schema;

pub use loader::{load_config, search_paths};
pub use schema::{
    ConfigError, HealConfig, LlkbConfig, LlkbLevel, PathsConfig, RegenerationStrategy,
    SelectorPolicyConfig, ValidationConfig, WaymarkConfig, CURRENT_SCHEMA_VERSION,
};
