//! Coded failures surfaced by code generation.

use waymark_types::CodedError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CodegenError {
    #[error("{0}")]
    Coded(#[from] CodedError),
    #[error("CODEGEN_MERGE_ERROR: {0}")]
    MergeFailed(String),
}
