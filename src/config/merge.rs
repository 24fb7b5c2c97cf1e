//! Recursive merge of configuration trees

use serde_yaml::Value;

/// Merge `overrides` over `base`, returning a new tree
///
/// For every key in `overrides`: when both sides hold a mapping the two are
/// merged recursively, otherwise the override value replaces the base value
/// wholesale. Keys that only exist in `base` are kept, so the result always
/// carries every base key. A non-mapping `overrides` replaces `base` entirely.
pub fn deep_merge(overrides: &Value, base: &Value) -> Value {
    match (overrides, base) {
        (Value::Mapping(patch), Value::Mapping(original)) => {
            let mut merged = original.clone();
            for (key, value) in patch {
                let next = match original.get(key) {
                    Some(existing) => deep_merge(value, existing),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Mapping(merged)
        }
        _ => overrides.clone(),
    }
}
