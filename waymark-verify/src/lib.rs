//! Failure classification and runner-report summarization (spec.md §4.14,
//! §4.16).

pub mod classifier;
pub mod errors;
pub mod summary;

pub use classifier::{classify_failure, Classification, FailureCategory};
pub use errors::VerifyError;
pub use summary::{summarize, FailedTest, VerifyStatus, VerifySummary};
