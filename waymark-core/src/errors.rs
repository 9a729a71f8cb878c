//! Coded failures surfaced by journey parsing.

use waymark_types::{CodedError, ErrorCode};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("{0}")]
    Coded(#[from] CodedError),
    #[error("YAML_PARSE_ERROR: {path}: {message}")]
    Yaml { path: String, message: String },
}

impl ParseError {
    #[must_use]
    pub fn frontmatter_not_found(path: impl Into<String>) -> Self {
        Self::Coded(CodedError::frontmatter_not_found(path))
    }

    #[must_use]
    pub fn validation(path: impl Into<String>, issues: &[String]) -> Self {
        Self::Coded(
            CodedError::new(
                ErrorCode::FrontmatterValidationError,
                format!("{}: {} issue(s)", path.into(), issues.len()),
            )
            .with_details(issues.join("; ")),
        )
    }

    /// Surfaced only if a journey id passes `journey_id_re` at parse time
    /// but is somehow still rejected by the stricter `JourneyId` newtype.
    #[must_use]
    pub fn invalid_journey_id(raw: &str) -> Self {
        Self::Coded(CodedError::new(
            ErrorCode::FrontmatterValidationError,
            format!("invalid journey id {raw:?}"),
        ))
    }
}
