//! Coded failures surfaced by the LLKB store.

use waymark_types::{CodedError, ErrorCode};

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlkbError {
    #[error("{0}")]
    Coded(#[from] CodedError),
    #[error("LLKB_IO_ERROR: {path}: {message}")]
    Io { path: String, message: String },
}

impl LlkbError {
    #[must_use]
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn config_load(message: impl Into<String>) -> Self {
        Self::Coded(CodedError::new(ErrorCode::ConfigLoad, message))
    }
}
