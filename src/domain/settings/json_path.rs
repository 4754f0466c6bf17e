//! Helpers for merging JSON records and addressing them by dotted paths

use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Merges `source` onto `target`, returning the merged value
///
/// Objects merge key by key, recursively. Any other source value (arrays
/// included) replaces what the target holds.
pub fn deep_merge(target: &Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            let mut merged = target_map.clone();

            for (key, source_value) in source_map {
                let value = match merged.get(key) {
                    Some(existing) if existing.is_object() && source_value.is_object() => {
                        deep_merge(existing, source_value)
                    }
                    _ => source_value.clone(),
                };
                merged.insert(key.clone(), value);
            }

            Value::Object(merged)
        }
        _ => source.clone(),
    }
}

/// Looks up a dotted path such as `dockerConfig.port`
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |current, segment| current.as_object()?.get(segment))
}

/// Writes `value` at a dotted path, creating missing intermediate objects
pub fn set_path(root: &mut Value, path: &str, value: Value) -> Result<(), DomainError> {
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(DomainError::validation(format!("Invalid setting path '{}'", path)));
    }

    let mut segments: Vec<&str> = path.split('.').collect();
    let last = segments.pop().unwrap_or(path);

    let mut current = root;
    for segment in segments {
        let map = as_object_mut(current, path)?;
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    as_object_mut(current, path)?.insert(last.to_string(), value);
    Ok(())
}

fn as_object_mut<'a>(
    value: &'a mut Value,
    path: &str,
) -> Result<&'a mut Map<String, Value>, DomainError> {
    value.as_object_mut().ok_or_else(|| {
        DomainError::validation(format!(
            "Cannot set '{}': an intermediate value is not an object",
            path
        ))
    })
}
