//! Test-spec/page-object rendering, managed-block regeneration, and
//! structural page-object merge (spec.md §4.11).

pub mod errors;
pub mod managed_block;
pub mod merge;
pub mod render;
pub mod template;

pub use errors::CodegenError;
pub use managed_block::{extract, inject, ExtractResult, ManagedBlock};
pub use merge::{add_missing_locators, ensure_imports, escape_for_merge, RequiredLocator};
pub use render::{escape_regex, escape_string, render_primitive, RenderedPrimitive};
pub use template::{generate_module, generate_test, GenerateOptions, GeneratedFile};
