//! Deep merge of two parsed config documents.
//!
//! Objects merge recursively, key by key. Arrays overwrite by default — the
//! more specific file wins — except `forbiddenPatterns`, which is additive
//! (spec.md §4.18): each file's entries accumulate rather than replace.

use serde_json::Value;

const ADDITIVE_ARRAY_KEYS: &[&str] = &["forbiddenPatterns"];

/// Merge `overlay` onto `base`, `overlay` taking precedence except where a
/// key is named in [`ADDITIVE_ARRAY_KEYS`].
#[must_use]
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => merge_keyed(&key, base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

fn merge_keyed(key: &str, base_value: Value, overlay_value: Value) -> Value {
    match (base_value, overlay_value) {
        (Value::Array(mut base_items), Value::Array(overlay_items)) if is_additive(key) => {
            for item in overlay_items {
                if !base_items.contains(&item) {
                    base_items.push(item);
                }
            }
            Value::Array(base_items)
        }
        (base_value, overlay_value) => deep_merge(base_value, overlay_value),
    }
}

fn is_additive(key: &str) -> bool {
    ADDITIVE_ARRAY_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_recursively() {
        let base = json!({ "paths": { "journeys": "a", "tests": "t" } });
        let overlay = json!({ "paths": { "journeys": "b" } });
        let merged = deep_merge(base, overlay);
        assert_eq!(merged, json!({ "paths": { "journeys": "b", "tests": "t" } }));
    }

    #[test]
    fn forbidden_patterns_accumulate_without_duplicates() {
        let base = json!({ "selectorPolicy": { "forbiddenPatterns": ["a", "b"] } });
        let overlay = json!({ "selectorPolicy": { "forbiddenPatterns": ["b", "c"] } });
        let merged = deep_merge(base, overlay);
        assert_eq!(
            merged,
            json!({ "selectorPolicy": { "forbiddenPatterns": ["a", "b", "c"] } })
        );
    }

    #[test]
    fn priority_array_is_overwritten_not_merged() {
        let base = json!({ "selectorPolicy": { "priority": ["role", "css"] } });
        let overlay = json!({ "selectorPolicy": { "priority": ["test_id"] } });
        let merged = deep_merge(base, overlay);
        assert_eq!(
            merged,
            json!({ "selectorPolicy": { "priority": ["test_id"] } })
        );
    }
}
