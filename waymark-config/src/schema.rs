//! Typed config document and its `jsonschema` validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use waymark_types::LocatorStrategy;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("CONFIG_LOAD: failed to read {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("CONFIG_LOAD: failed to parse YAML in {path}: {source}")]
    Yaml { path: String, source: serde_yaml::Error },
    #[error("CONFIG_LOAD: schema validation failed: {0}")]
    SchemaInvalid(String),
    #[error("CONFIG_LOAD: unsupported schema version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathsConfig {
    #[serde(default = "default_journeys_path")]
    pub journeys: String,
    #[serde(default = "default_modules_path")]
    pub modules: String,
    #[serde(default = "default_tests_path")]
    pub tests: String,
    #[serde(default = "default_templates_path")]
    pub templates: String,
    #[serde(default = "default_catalog_path")]
    pub catalog: String,
}

fn default_journeys_path() -> String {
    "journeys".to_string()
}
fn default_modules_path() -> String {
    "src/modules".to_string()
}
fn default_tests_path() -> String {
    "tests".to_string()
}
fn default_templates_path() -> String {
    "templates".to_string()
}
fn default_catalog_path() -> String {
    ".waymark/selector-catalog.json".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            journeys: default_journeys_path(),
            modules: default_modules_path(),
            tests: default_tests_path(),
            templates: default_templates_path(),
            catalog: default_catalog_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorPolicyConfig {
    #[serde(default)]
    pub priority: Vec<LocatorStrategy>,
    #[serde(default)]
    pub forbidden_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    #[serde(default)]
    pub eslint_rules: BTreeMap<String, Value>,
    #[serde(default)]
    pub custom_rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: u32,
    #[serde(default)]
    pub skip_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_max_suggestions() -> u32 {
    3
}

impl Default for HealConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_suggestions: default_max_suggestions(),
            skip_patterns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegenerationStrategy {
    Ast,
    #[default]
    Blocks,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlkbLevel {
    Minimal,
    #[default]
    Enhance,
    Aggressive,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlkbConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glossary_path: Option<String>,
    #[serde(default)]
    pub level: LlkbLevel,
}

/// The merged, migrated, schema-validated config document (spec.md §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaymarkConfig {
    pub schema_version: u32,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub selector_policy: SelectorPolicyConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub heal: HealConfig,
    #[serde(default)]
    pub regeneration_strategy: RegenerationStrategy,
    #[serde(default)]
    pub llkb: LlkbConfig,
}

impl Default for WaymarkConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            paths: PathsConfig::default(),
            selector_policy: SelectorPolicyConfig::default(),
            validation: ValidationConfig::default(),
            heal: HealConfig::default(),
            regeneration_strategy: RegenerationStrategy::default(),
            llkb: LlkbConfig::default(),
        }
    }
}

pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// The dynamic `jsonschema` document the merged config is validated against,
/// in addition to static `serde` deserialization — config is the one input
/// surface here that is genuinely version-evolving rather than fixed at
/// compile time.
#[must_use]
pub fn config_json_schema() -> Value {
    json!({
        "type": "object",
        "required": ["schemaVersion"],
        "properties": {
            "schemaVersion": { "type": "integer", "minimum": 1 },
            "paths": { "type": "object" },
            "selectorPolicy": {
                "type": "object",
                "properties": {
                    "priority": { "type": "array", "items": { "type": "string" } },
                    "forbiddenPatterns": { "type": "array", "items": { "type": "string" } }
                }
            },
            "validation": { "type": "object" },
            "heal": {
                "type": "object",
                "properties": {
                    "enabled": { "type": "boolean" },
                    "maxSuggestions": { "type": "integer", "minimum": 0 },
                    "skipPatterns": { "type": "array", "items": { "type": "string" } }
                }
            },
            "regenerationStrategy": { "enum": ["ast", "blocks"] },
            "llkb": {
                "type": "object",
                "properties": {
                    "enabled": { "type": "boolean" },
                    "configPath": { "type": "string" },
                    "glossaryPath": { "type": "string" },
                    "level": { "enum": ["minimal", "enhance", "aggressive"] }
                }
            }
        }
    })
}

/// Validate a merged, migrated config document against [`config_json_schema`].
pub fn validate_against_schema(document: &Value) -> Result<(), ConfigError> {
    let schema = config_json_schema();
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| ConfigError::SchemaInvalid(e.to_string()))?;
    if let Err(err) = validator.validate(document) {
        return Err(ConfigError::SchemaInvalid(err.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_current_schema_version() {
        assert_eq!(WaymarkConfig::default().schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn schema_accepts_minimal_document() {
        let doc = json!({ "schemaVersion": 2 });
        assert!(validate_against_schema(&doc).is_ok());
    }

    #[test]
    fn schema_rejects_missing_schema_version() {
        let doc = json!({ "paths": {} });
        assert!(validate_against_schema(&doc).is_err());
    }

    #[test]
    fn schema_rejects_wrong_regeneration_strategy_value() {
        let doc = json!({ "schemaVersion": 2, "regenerationStrategy": "trees" });
        assert!(validate_against_schema(&doc).is_err());
    }
}
