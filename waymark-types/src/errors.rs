//! Coded errors shared across the pipeline (spec.md §7): every library error
//! carries a stable `code` alongside its human message, so callers can match
//! on failure kind without parsing strings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    FrontmatterNotFound,
    YamlParseError,
    FrontmatterValidationError,
    ConfigLoad,
    PathTraversal,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::FrontmatterNotFound => "FRONTMATTER_NOT_FOUND",
            ErrorCode::YamlParseError => "YAML_PARSE_ERROR",
            ErrorCode::FrontmatterValidationError => "FRONTMATTER_VALIDATION_ERROR",
            ErrorCode::ConfigLoad => "CONFIG_LOAD",
            ErrorCode::PathTraversal => "PATH_TRAVERSAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{code, message, details?}` (spec.md §7). Implements `std::error::Error`
/// so it composes under `thiserror`'s `#[from]` in downstream crates.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct CodedError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CodedError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn frontmatter_not_found(path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::FrontmatterNotFound,
            format!("no YAML frontmatter block found in {}", path.into()),
        )
    }

    #[must_use]
    pub fn path_traversal(path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::PathTraversal,
            format!("path escapes the allowed root: {}", path.into()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_message() {
        let err = CodedError::new(ErrorCode::ConfigLoad, "missing file");
        assert_eq!(err.to_string(), "CONFIG_LOAD: missing file");
    }

    #[test]
    fn code_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::YamlParseError).unwrap();
        assert_eq!(json, "\"YAML_PARSE_ERROR\"");
    }
}
