//! Parse → normalize → render → validate, the "compile one journey" step
//! that every pipeline stage transition builds on.

use std::path::Path;

use anyhow::Context as _;
use waymark_codegen::{generate_module, generate_test, GenerateOptions, GeneratedFile};
use waymark_core::journey_parser::parse;
use waymark_core::normalizer::normalize_journey;
use waymark_core::step_mapper::LlkbLookup;
use waymark_types::{Journey, Variant};
use waymark_validators::{validate_code, ValidationReport};

use crate::context::WaymarkContext;

/// The full output of compiling one journey file: the IR, both generated
/// files, and the validation report over the generated test.
pub struct CompiledJourney {
    pub journey: Journey,
    pub test_file: GeneratedFile,
    pub module_file: GeneratedFile,
    pub validation: ValidationReport,
}

/// Compiles one journey file through the whole parse/normalize/render/
/// validate chain. Never partial: a parse or normalization failure aborts
/// with `Err` (spec.md §7 "parse errors abort that journey"), while a
/// mapping miss inside the journey becomes a `Blocked` primitive that still
/// compiles through to a (failing-by-construction) generated test.
pub fn compile_journey(
    ctx: &WaymarkContext,
    journey_path: &Path,
    variant: &Variant,
    module_import_base: impl Into<String>,
) -> anyhow::Result<CompiledJourney> {
    let parsed = parse(journey_path)
        .with_context(|| format!("parsing journey {}", journey_path.display()))?;

    let llkb: Option<&dyn LlkbLookup> = ctx.llkb().map(|store| store as &dyn LlkbLookup);
    let journey = normalize_journey(&parsed, ctx.glossary(), ctx.pattern_records(), llkb)
        .with_context(|| format!("normalizing journey {}", journey_path.display()))?;

    let options = GenerateOptions {
        variant: variant.clone(),
        module_import_base: module_import_base.into(),
    };
    let test_file = generate_test(&journey, &options);
    let module_file = generate_module(&journey, &options);
    let validation = validate_code(&test_file.content, &journey);

    if journey.has_any_blocked() {
        tracing::warn!(journey = journey.id.as_str(), "journey compiled with unmapped steps left as blocked");
    }

    Ok(CompiledJourney { journey, test_file, module_file, validation })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"---
id: JRN-0001
title: User signs in
status: clarified
tier: smoke
scope: auth
actor: member
completion:
  - type: url
    value: "/dashboard"
---

## Acceptance Criteria

### AC-1: Sign in

- Navigate to "/login"
- Fill "user@example.com" into "email"
- Click "Sign In"
- User sees "Welcome"
"#;

    #[test]
    fn compiles_a_clean_journey_with_no_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let journey_path = dir.path().join("sign-in.md");
        std::fs::write(&journey_path, SAMPLE).unwrap();

        let ctx = WaymarkContext::load(dir.path()).unwrap();
        let variant = Variant::unknown();
        let compiled = compile_journey(&ctx, &journey_path, &variant, "../modules").unwrap();

        assert_eq!(compiled.journey.id.as_str(), "JRN-0001");
        assert!(!compiled.validation.has_errors());
        assert!(compiled.test_file.content.contains("Sign In"));
        assert!(
            !compiled.journey.has_any_blocked(),
            "every step of this journey (including the bare \"Navigate to ...\" bullet) should \
             map to a primitive, not fall through to Blocked"
        );
    }

    #[test]
    fn missing_journey_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = WaymarkContext::load(dir.path()).unwrap();
        let variant = Variant::unknown();
        let result = compile_journey(&ctx, &dir.path().join("missing.md"), &variant, "../modules");
        assert!(result.is_err());
    }
}
