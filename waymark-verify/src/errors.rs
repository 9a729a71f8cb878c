//! Coded failures surfaced while summarizing a runner report.

use waymark_types::CodedError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum VerifyError {
    #[error("{0}")]
    Coded(#[from] CodedError),
    #[error("VERIFY_REPORT_PARSE_ERROR: {0}")]
    ReportParse(String),
}
