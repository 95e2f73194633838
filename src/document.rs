//! Dotted-path access into JSON documents
//!
//! Paths use `.` as the separator (`pluginData.nodeVersion`). Array indices
//! are not addressed; a path segment always names an object key.

use serde_json::{Map, Value};

/// Resolves a dotted path against a document.
pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Resolves a dotted path against an object, returning a mutable slot.
pub fn get_path_mut<'a>(obj: &'a mut Map<String, Value>, path: &str) -> Option<&'a mut Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = obj.get_mut(first)?;
    for segment in segments {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}

/// Writes `value` at a dotted path, creating intermediate objects.
///
/// Intermediate values that are not objects are replaced.
pub fn set_path(obj: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            obj.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = obj
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                set_path(child, rest, value);
            }
        }
    }
}

/// Joins a prefix and a key with `.`, omitting the separator for an empty prefix.
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_nested_path() {
        let doc = json!({"pluginData": {"nodeVersion": "1"}});
        assert_eq!(get_path(&doc, "pluginData.nodeVersion"), Some(&json!("1")));
        assert_eq!(get_path(&doc, "pluginData.missing"), None);
        assert_eq!(get_path(&doc, "pluginData.nodeVersion.deeper"), None);
    }

    #[test]
    fn test_set_path_creates_intermediates() {
        let mut obj = Map::new();
        set_path(&mut obj, "a.b.c", json!(3));
        assert_eq!(Value::Object(obj), json!({"a": {"b": {"c": 3}}}));
    }

    #[test]
    fn test_set_path_replaces_scalar_intermediate() {
        let mut obj = json!({"a": 1}).as_object().cloned().unwrap();
        set_path(&mut obj, "a.b", json!(true));
        assert_eq!(Value::Object(obj), json!({"a": {"b": true}}));
    }

    #[test]
    fn test_get_path_mut() {
        let mut obj = json!({"a": {"b": 1}}).as_object().cloned().unwrap();
        *get_path_mut(&mut obj, "a.b").unwrap() = json!(2);
        assert_eq!(obj["a"]["b"], json!(2));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "name"), "name");
        assert_eq!(join_path("chatConfig", "ttsConfig"), "chatConfig.ttsConfig");
    }
}
