//! Structural page-object merge, the `ast` regeneration strategy for page
//! modules (spec.md §4.11).
//!
//! This is a deliberately simplified, regex/line-based approximation of an
//! AST merge, not a real TypeScript parser: no parser crate appears
//! anywhere in the retrieval pack (see `DESIGN.md`). It targets the shape
//! [`crate::template::generate_module`] emits — a single exported class
//! with `readonly` properties and a constructor — and is structural only:
//! it recognizes that shape well enough to add what's missing, and leaves
//! anything it doesn't recognize untouched.

use regex::Regex;

use waymark_types::LocatorSpec;

use crate::render::escape_string;

const REQUIRED_IMPORTS: &[&str] = &["Locator", "Page"];

/// Counts `{}`/`()`/`[]` across the whole file. Not a real parser — there is
/// no TypeScript parser crate anywhere in the retrieval pack (see module
/// doc) — but it is enough to catch a merge that inserted an unterminated
/// brace or an unmatched paren into the rendered locator expression, which
/// is the failure mode a regex-splice merge can actually produce.
fn bracket_counts(code: &str) -> (i64, i64, i64) {
    let mut braces = 0i64;
    let mut parens = 0i64;
    let mut brackets = 0i64;
    for ch in code.chars() {
        match ch {
            '{' => braces += 1,
            '}' => braces -= 1,
            '(' => parens += 1,
            ')' => parens -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            _ => {}
        }
    }
    (braces, parens, brackets)
}

/// `None` when `code`'s brackets balance, otherwise a warning describing
/// which bracket kind is unbalanced (spec.md §4.11's AST-strategy note:
/// "Syntax is validated after transforms").
fn structural_warning(code: &str) -> Option<String> {
    let (braces, parens, brackets) = bracket_counts(code);
    if braces == 0 && parens == 0 && brackets == 0 {
        return None;
    }
    Some(format!(
        "merge produced unbalanced brackets (braces={braces:+}, parens={parens:+}, \
         square={brackets:+}); regenerated output is likely invalid syntax"
    ))
}

/// Ensures `import { Locator, Page } from '@playwright/test';` carries every
/// name in [`REQUIRED_IMPORTS`], extending an existing import statement in
/// place or prepending a new one if none exists. The third element is a
/// post-merge structural-validation warning, empty when the result balances.
#[must_use]
pub fn ensure_imports(source: &str) -> (String, bool, Vec<String>) {
    let import_re = Regex::new(r"(?m)^import \{([^}]*)\} from '@playwright/test';\s*$")
        .expect("static import pattern compiles");

    if let Some(m) = import_re.find(source) {
        let caps = import_re.captures(source).expect("matched above");
        let existing: Vec<String> = caps[1].split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        let mut names = existing.clone();
        let mut changed = false;
        for required in REQUIRED_IMPORTS {
            if !names.iter().any(|n| n == required) {
                names.push((*required).to_string());
                changed = true;
            }
        }
        if !changed {
            return (source.to_string(), false, Vec::new());
        }
        let replacement = format!("import {{ {} }} from '@playwright/test';", names.join(", "));
        let mut out = String::with_capacity(source.len());
        out.push_str(&source[..m.start()]);
        out.push_str(&replacement);
        out.push_str(&source[m.end()..]);
        let warnings = structural_warning(&out).into_iter().collect();
        (out, true, warnings)
    } else {
        let mut out = format!(
            "import {{ {} }} from '@playwright/test';\n",
            REQUIRED_IMPORTS.join(", ")
        );
        out.push_str(source);
        let warnings = structural_warning(&out).into_iter().collect();
        (out, true, warnings)
    }
}

/// One property this module's class should declare.
#[derive(Debug, Clone)]
pub struct RequiredLocator {
    pub property: String,
    pub locator: LocatorSpec,
}

/// Adds any `readonly <property>: Locator;` declarations and matching
/// constructor initializers that `required` names but the class body does
/// not already declare. Existing declarations are left untouched unless
/// `preserve_existing` is false and a same-named declaration already exists
/// with different content, in which case it is replaced.
#[must_use]
pub fn add_missing_locators(source: &str, required: &[RequiredLocator], preserve_existing: bool) -> (String, Vec<String>) {
    let mut out = source.to_string();
    let mut warnings = Vec::new();

    let class_re = Regex::new(r"(?m)^export class \w+ \{").expect("static class pattern compiles");
    let Some(class_match) = class_re.find(&out) else {
        warnings.push("no `export class` declaration found; cannot merge locators".to_string());
        return (out, warnings);
    };
    let insert_at_properties = class_match.end();

    let constructor_re = Regex::new(r"(?m)^\s*constructor\([^)]*\)\s*\{").expect("static constructor pattern compiles");
    let Some(ctor_match) = constructor_re.find(&out) else {
        warnings.push("no constructor found; cannot merge locator initializers".to_string());
        return (out, warnings);
    };

    let mut new_properties = String::new();
    let mut new_initializers = String::new();

    for item in required {
        let decl_re = Regex::new(&format!(r"readonly\s+{}\s*:\s*Locator", regex::escape(&item.property)))
            .expect("property pattern compiles");
        let init_re = Regex::new(&format!(r"this\.{}\s*=", regex::escape(&item.property)))
            .expect("initializer pattern compiles");

        let declared = decl_re.is_match(&out);
        let initialized = init_re.is_match(&out);

        if declared && initialized && preserve_existing {
            continue;
        }

        if !declared {
            new_properties.push_str(&format!("\n  readonly {}: Locator;", item.property));
        }
        if !initialized || !preserve_existing {
            let rendered = waymark_selectors::to_playwright_locator(&item.locator);
            new_initializers.push_str(&format!("\n    this.{} = {};", item.property, rendered));
        }
    }

    if !new_properties.is_empty() {
        out.insert_str(insert_at_properties, &new_properties);
    }
    if !new_initializers.is_empty() {
        let ctor_end = if new_properties.is_empty() {
            ctor_match.end()
        } else {
            ctor_match.end() + new_properties.len()
        };
        out.insert_str(ctor_end, &new_initializers);
    }

    warnings.extend(structural_warning(&out));
    (out, warnings)
}

#[must_use]
pub fn escape_for_merge(value: &str) -> String {
    escape_string(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::LocatorStrategy;

    #[test]
    fn ensure_imports_adds_missing_names_to_existing_statement() {
        let source = "import { Page } from '@playwright/test';\n\nexport class FooPage {}\n";
        let (out, changed, warnings) = ensure_imports(source);
        assert!(changed);
        assert!(out.contains("Locator"));
        assert!(out.contains("Page"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn ensure_imports_is_a_no_op_when_already_satisfied() {
        let source = "import { Locator, Page } from '@playwright/test';\n";
        let (_, changed, warnings) = ensure_imports(source);
        assert!(!changed);
        assert!(warnings.is_empty());
    }

    #[test]
    fn ensure_imports_prepends_when_missing_entirely() {
        let source = "export class FooPage {}\n";
        let (out, changed, warnings) = ensure_imports(source);
        assert!(changed);
        assert!(out.starts_with("import { Locator, Page }"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn add_missing_locators_adds_property_and_initializer() {
        let source = "import { Locator, Page } from '@playwright/test';\n\nexport class LoginPage {\n  readonly page: Page;\n\n  constructor(page: Page) {\n    this.page = page;\n  }\n}\n";
        let required = vec![RequiredLocator {
            property: "signInButton".to_string(),
            locator: LocatorSpec::role("button", Some("Sign In".to_string())),
        }];
        let (out, warnings) = add_missing_locators(source, &required, true);
        assert!(warnings.is_empty());
        assert!(out.contains("readonly signInButton: Locator;"));
        assert!(out.contains("this.signInButton ="));
    }

    #[test]
    fn add_missing_locators_preserves_existing_declaration_when_requested() {
        let source = "export class LoginPage {\n  readonly signInButton: Locator;\n\n  constructor(page: Page) {\n    this.signInButton = page.getByRole('button', { name: 'Custom' });\n  }\n}\n";
        let required = vec![RequiredLocator {
            property: "signInButton".to_string(),
            locator: LocatorSpec::new(LocatorStrategy::Css, ".btn"),
        }];
        let (out, _) = add_missing_locators(source, &required, true);
        assert!(out.contains("Custom"));
        assert!(!out.contains(".btn"));
    }

    #[test]
    fn structural_warning_is_none_for_balanced_code() {
        let source = "export class LoginPage {\n  readonly page: Page;\n\n  constructor(page: Page) {\n    this.page = page;\n  }\n}\n";
        assert!(structural_warning(source).is_none());
    }

    #[test]
    fn structural_warning_fires_on_unbalanced_braces() {
        let source = "export class LoginPage {\n  readonly page: Page;\n\n  constructor(page: Page) {\n    this.page = page;\n";
        let warning = structural_warning(source);
        assert!(warning.is_some());
        assert!(warning.unwrap().contains("braces"));
    }

    #[test]
    fn add_missing_locators_surfaces_a_warning_when_the_class_body_is_already_malformed() {
        let source = "export class LoginPage {\n  readonly page: Page;\n\n  constructor(page: Page) {\n    this.page = page;\n";
        let required = vec![RequiredLocator {
            property: "signInButton".to_string(),
            locator: LocatorSpec::role("button", Some("Sign In".to_string())),
        }];
        let (_, warnings) = add_missing_locators(source, &required, true);
        assert!(warnings.iter().any(|w| w.contains("unbalanced brackets")));
    }
}
