//! Version-numbered schema migrations: pure value-rewriting, no IO.
//!
//! Each step upgrades exactly one version. Running [`migrate_to_current`]
//! twice on an already-current document is a no-op, since every step first
//! checks the document's current `schemaVersion` before touching it.

use serde_json::Value;

use crate::schema::{ConfigError, CURRENT_SCHEMA_VERSION};

/// Schema v1 had no `regenerationStrategy` field; v2 introduced it, defaulting
/// to `"blocks"` for any document that predates it.
fn migrate_v1_to_v2(document: &mut Value) {
    if let Value::Object(map) = document {
        map.entry("regenerationStrategy")
            .or_insert_with(|| Value::String("blocks".to_string()));
        map.insert("schemaVersion".to_string(), Value::from(2));
    }
}

/// Rewrite `document` in place up to [`CURRENT_SCHEMA_VERSION`], applying
/// each version step exactly once in order.
pub fn migrate_to_current(document: &mut Value) -> Result<(), ConfigError> {
    let version = document
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .unwrap_or(1) as u32;

    if version > CURRENT_SCHEMA_VERSION {
        return Err(ConfigError::UnsupportedVersion(version));
    }

    let mut current = version;
    if current < 2 {
        migrate_v1_to_v2(document);
        current = 2;
    }

    debug_assert_eq!(current, CURRENT_SCHEMA_VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v1_document_gains_default_regeneration_strategy() {
        let mut doc = json!({ "schemaVersion": 1, "paths": { "journeys": "j" } });
        migrate_to_current(&mut doc).unwrap();
        assert_eq!(doc["schemaVersion"], json!(2));
        assert_eq!(doc["regenerationStrategy"], json!("blocks"));
    }

    #[test]
    fn current_document_is_untouched() {
        let mut doc = json!({ "schemaVersion": 2, "regenerationStrategy": "ast" });
        let before = doc.clone();
        migrate_to_current(&mut doc).unwrap();
        assert_eq!(doc, before);
    }

    #[test]
    fn migration_is_idempotent() {
        let mut doc = json!({ "schemaVersion": 1 });
        migrate_to_current(&mut doc).unwrap();
        let once = doc.clone();
        migrate_to_current(&mut doc).unwrap();
        assert_eq!(doc, once);
    }

    #[test]
    fn future_version_is_rejected() {
        let mut doc = json!({ "schemaVersion": 99 });
        assert!(migrate_to_current(&mut doc).is_err());
    }
}
