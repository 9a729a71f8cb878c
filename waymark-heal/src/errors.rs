//! Coded failures surfaced by the healing loop.

use waymark_types::CodedError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum HealError {
    #[error("{0}")]
    Coded(#[from] CodedError),
    #[error("HEAL_LOG_IO_ERROR: {path}: {message}")]
    LogIo { path: String, message: String },
}

impl HealError {
    #[must_use]
    pub fn log_io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LogIo {
            path: path.into(),
            message: message.into(),
        }
    }
}
