//! Loads config from the fixed search list, merging least- to most-specific.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::merge::deep_merge;
use crate::migrate::migrate_to_current;
use crate::schema::{validate_against_schema, ConfigError, WaymarkConfig};

/// The fixed search list (spec.md §6), probed in this order. Files that
/// exist are merged in *reverse* of probe order so the most specific one
/// (closest to the current directory) wins — the same precedence a shell's
/// `PATH`-like search gives the nearer entry.
#[must_use]
pub fn search_paths(cwd: &Path) -> Vec<PathBuf> {
    let mut paths = vec![
        cwd.join("waymark.config.yaml"),
        cwd.join(".waymark").join("config.yaml"),
    ];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("waymark").join("config.yaml"));
    }
    paths
}

/// Load and merge every existing file in [`search_paths`], migrate to the
/// current schema version, validate against the dynamic JSON schema, then
/// deserialize into a [`WaymarkConfig`].
pub fn load_config(cwd: &Path) -> Result<WaymarkConfig, ConfigError> {
    let candidates = search_paths(cwd);

    let mut merged = Value::Object(serde_json::Map::new());
    let mut found_any = false;

    for path in candidates.into_iter().rev() {
        if !path.exists() {
            continue;
        }
        found_any = true;
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let document: Value = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })?;
        merged = deep_merge(merged, document);
        tracing::debug!(path = %path.display(), "merged config file");
    }

    if !found_any {
        tracing::debug!("no config file found in search list, using defaults");
        return Ok(WaymarkConfig::default());
    }

    migrate_to_current(&mut merged)?;
    validate_against_schema(&merged)?;

    serde_json::from_value(merged)
        .map_err(|e| ConfigError::SchemaInvalid(format!("deserialization failed: {e}")))
}
