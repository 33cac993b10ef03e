//! Deep merge of configuration layers.
//!
//! Objects are merged key by key at every depth. Everything else, including
//! arrays and `null`, is replaced outright by the higher layer.

use serde_json::{Map, Value};

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans and nulls replace the base value
///
/// # Example
/// ```
/// use serde_json::json;
/// use gitlike_config::config::deep_merge;
///
/// let base = json!({
///     "editor": { "tabs": 4, "theme": "dark" },
///     "plugins": ["a", "b"]
/// });
/// let overlay = json!({
///     "editor": { "tabs": 2 },
///     "plugins": ["c"]
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(
///     result,
///     json!({ "editor": { "tabs": 2, "theme": "dark" }, "plugins": ["c"] })
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge_maps(base_map, overlay_map))
        }
        (_, overlay) => overlay,
    }
}

/// Merge two mappings, with `overlay` keys taking precedence.
pub fn merge_maps(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged);
    }
    base
}

/// Merge layers in order, with later layers taking precedence.
///
/// Starts from an empty object, so the result is always an object.
pub fn merge_layers<'a>(layers: impl IntoIterator<Item = &'a Map<String, Value>>) -> Value {
    let merged = layers
        .into_iter()
        .fold(Map::new(), |acc, layer| merge_maps(acc, layer.clone()));
    Value::Object(merged)
}
