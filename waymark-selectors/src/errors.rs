//! Coded failures surfaced by selector scanning.

use waymark_types::CodedError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SelectorsError {
    #[error("{0}")]
    Coded(#[from] CodedError),
    #[error("SELECTOR_SCAN_IO: {path}: {message}")]
    ScanIo { path: String, message: String },
    #[error("SELECTOR_SCAN_GLOB: {0}")]
    InvalidGlob(String),
}

impl SelectorsError {
    #[must_use]
    pub fn scan_io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ScanIo {
            path: path.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn path_traversal(path: impl Into<String>) -> Self {
        Self::Coded(CodedError::path_traversal(path))
    }

    #[must_use]
    pub fn invalid_glob(message: impl Into<String>) -> Self {
        Self::InvalidGlob(message.into())
    }
}
