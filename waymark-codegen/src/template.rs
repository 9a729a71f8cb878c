//! `generateTest`/`generateModule` (spec.md §4.11): assembles a full test
//! spec or page-object module from an IR [`Journey`], wrapping each step in
//! a managed block so the `blocks` regeneration strategy can target it.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use waymark_types::{Journey, Primitive, Step, Variant};

use crate::render::render_primitive;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub variant: Variant,
    pub module_import_base: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            variant: Variant::unknown(),
            module_import_base: "../modules".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub content: String,
    pub warnings: Vec<String>,
}

/// Generates a full Playwright test spec for `journey`. Setup precedes
/// steps precedes cleanup; within a step, actions precede assertions
/// (spec.md §5's ordering guarantees). Each step is wrapped in its own
/// managed block (`id=step-<n>`) so `blocks` regeneration can target it.
#[must_use]
pub fn generate_test(journey: &Journey, options: &GenerateOptions) -> GeneratedFile {
    let mut warnings = Vec::new();
    let mut body = String::new();

    for primitive in &journey.setup {
        emit_primitive(&mut body, primitive, options, &mut warnings, "    ");
    }

    for step in &journey.steps {
        let _ = writeln!(body, "    // BEGIN GENERATED [id=step-{}]", step.id.value());
        let _ = writeln!(body, "    // {}", step.description);
        emit_step(&mut body, step, options, &mut warnings);
        body.push_str("    // END GENERATED\n");
    }

    for primitive in &journey.cleanup {
        emit_primitive(&mut body, primitive, options, &mut warnings, "    ");
    }

    let tags = journey.expected_standard_tags().join(" ");
    let imports = render_module_imports(journey, options);

    let mut content = String::new();
    content.push_str("import { test, expect } from '@playwright/test';\n");
    content.push_str(&imports);
    content.push('\n');
    let _ = writeln!(content, "test.describe('{} [{}]', () => {{", escape_single(&journey.title), tags);
    let _ = writeln!(content, "  test('{}', async ({{ page }}) => {{", escape_single(&journey.title));
    content.push_str(&body);
    content.push_str("  });\n");
    content.push_str("});\n");

    GeneratedFile { content, warnings }
}

fn emit_step(body: &mut String, step: &Step, options: &GenerateOptions, warnings: &mut Vec<String>) {
    for primitive in &step.actions {
        emit_primitive(body, primitive, options, warnings, "    ");
    }
    for primitive in &step.assertions {
        emit_primitive(body, primitive, options, warnings, "    ");
    }
}

fn emit_primitive(
    body: &mut String,
    primitive: &Primitive,
    options: &GenerateOptions,
    warnings: &mut Vec<String>,
    indent: &str,
) {
    let rendered = render_primitive(primitive, &options.variant);
    for line in rendered.statement.lines() {
        let _ = writeln!(body, "{indent}{line}");
    }
    warnings.extend(rendered.warnings);
}

fn render_module_imports(journey: &Journey, options: &GenerateOptions) -> String {
    let modules = collect_called_modules(journey);
    let mut out = String::new();
    for module in modules {
        let _ = writeln!(
            out,
            "import {{ {module} }} from '{}/{}';",
            options.module_import_base,
            to_kebab_case(&module)
        );
    }
    out
}

fn collect_called_modules(journey: &Journey) -> BTreeSet<String> {
    let mut modules = BTreeSet::new();
    let all_primitives = journey
        .setup
        .iter()
        .chain(journey.cleanup.iter())
        .chain(journey.steps.iter().flat_map(|s| s.actions.iter().chain(s.assertions.iter())));
    for primitive in all_primitives {
        if let Primitive::CallModule { module, .. } = primitive {
            modules.insert(module.clone());
        }
    }
    modules
}

fn to_kebab_case(value: &str) -> String {
    let mut out = String::new();
    for (i, ch) in value.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn escape_single(value: &str) -> String {
    value.replace('\'', "\\'")
}

/// Generates a page-object module scaffold: one property plus accessor
/// per distinct locator referenced by the journey's actions, named after
/// the locator's kind and a slug of its value.
#[must_use]
pub fn generate_module(journey: &Journey, _options: &GenerateOptions) -> GeneratedFile {
    let class_name = format!("{}Page", to_pascal_case(&journey.scope));
    let mut locators = Vec::new();
    let mut seen = BTreeSet::new();

    for step in &journey.steps {
        for primitive in step.actions.iter().chain(step.assertions.iter()) {
            if let Some(locator) = primitive.locator() {
                let prop = locator_property_name(locator);
                if seen.insert(prop.clone()) {
                    locators.push((prop, locator.clone()));
                }
            }
        }
    }

    let mut content = String::new();
    content.push_str("import { Locator, Page } from '@playwright/test';\n\n");
    let _ = writeln!(content, "export class {class_name} {{");
    content.push_str("  readonly page: Page;\n");
    for (prop, _) in &locators {
        let _ = writeln!(content, "  readonly {prop}: Locator;");
    }
    content.push('\n');
    content.push_str("  constructor(page: Page) {\n");
    content.push_str("    this.page = page;\n");
    for (prop, locator) in &locators {
        let _ = writeln!(
            content,
            "    this.{prop} = {};",
            waymark_selectors::to_playwright_locator(locator)
        );
    }
    content.push_str("  }\n");
    content.push_str("}\n");

    GeneratedFile {
        content,
        warnings: Vec::new(),
    }
}

fn locator_property_name(locator: &waymark_types::LocatorSpec) -> String {
    let slug = locator
        .value
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>();
    let mut words = slug.split_whitespace();
    let mut name = words.next().map(str::to_lowercase).unwrap_or_default();
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.push_str(&chars.as_str().to_lowercase());
        }
    }
    if name.is_empty() {
        "element".to_string()
    } else {
        name
    }
}

fn to_pascal_case(value: &str) -> String {
    value
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::{
        CleanupPolicy, CompletionSignal, DataPolicy, DataStrategy, JourneyId, LocatorSpec, LocatorStrategy,
        StepId, Tier,
    };

    fn sample_journey() -> Journey {
        let mut step = Step::new(StepId::new(1), "Sign in");
        step.actions.push(Primitive::Click {
            locator: LocatorSpec::role("button", Some("Sign In".to_string())),
        });
        step.assertions.push(Primitive::ExpectVisible {
            locator: waymark_types::LocatorSpec::new(LocatorStrategy::Text, "Welcome"),
        });

        Journey {
            id: JourneyId::new("JRN-0001").unwrap(),
            title: "User signs in".to_string(),
            tier: Tier::Smoke,
            scope: "login".to_string(),
            actor: "user".to_string(),
            revision: 1,
            tags: Vec::new(),
            module_dependencies: Default::default(),
            data: DataPolicy {
                strategy: DataStrategy::Reuse,
                cleanup: CleanupPolicy::None,
            },
            completion: Vec::<CompletionSignal>::new(),
            steps: vec![step],
            setup: Vec::new(),
            cleanup: Vec::new(),
            prerequisites: Vec::new(),
            negative_paths: Vec::new(),
            test_data: Vec::new(),
            visual_regression: false,
            accessibility: false,
            performance: None,
        }
    }

    #[test]
    fn generate_test_includes_standard_tags_and_managed_step_blocks() {
        let journey = sample_journey();
        let generated = generate_test(&journey, &GenerateOptions::default());
        assert!(generated.content.contains("@JRN-0001"));
        assert!(generated.content.contains("@tier-smoke"));
        assert!(generated.content.contains("BEGIN GENERATED [id=step-1]"));
        assert!(generated.content.contains("click();"));
        assert!(generated.content.contains("toBeVisible();"));
    }

    #[test]
    fn generate_test_action_precedes_assertion_within_a_step() {
        let journey = sample_journey();
        let generated = generate_test(&journey, &GenerateOptions::default());
        let click_pos = generated.content.find("click();").unwrap();
        let assert_pos = generated.content.find("toBeVisible();").unwrap();
        assert!(click_pos < assert_pos);
    }

    #[test]
    fn generate_module_emits_one_property_per_distinct_locator() {
        let journey = sample_journey();
        let generated = generate_module(&journey, &GenerateOptions::default());
        assert!(generated.content.contains("export class LoginPage"));
        assert!(generated.content.contains("readonly page: Page;"));
        assert!(generated.content.contains("getByRole('button'"));
    }
}
