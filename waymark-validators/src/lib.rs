//! Forbidden-pattern scanning, tag conformance, and AC-coverage validators
//! over generated code and its source IR journey (spec.md §4.12).

pub mod coverage;
pub mod forbidden;
pub mod report;
pub mod tags;

pub use coverage::{compute_ac_coverage, AcCoverage, CoverageReport};
pub use forbidden::{scan_forbidden_patterns, ForbiddenHit, Severity};
pub use report::{validate_code, ValidationReport};
pub use tags::{validate_tags, TagIssue};
