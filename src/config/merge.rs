//! Deep merge of YAML configuration tiers.
//!
//! Mappings merge key by key with the overlay winning; sequences and scalars
//! are replaced entirely.

use serde_yaml::Value;

/// Deep merge two YAML values, with `overlay` taking precedence over `base`.
///
/// A null overlay means "not specified" and keeps the base value.
///
/// # Example
/// ```
/// use dashboard_config::config::deep_merge;
///
/// let base: serde_yaml::Value = serde_yaml::from_str("server: {host: localhost, port: 3000}").unwrap();
/// let overlay: serde_yaml::Value = serde_yaml::from_str("server: {port: 8080}").unwrap();
/// let merged = deep_merge(base, overlay);
/// assert_eq!(merged["server"]["host"].as_str(), Some("localhost"));
/// assert_eq!(merged["server"]["port"].as_u64(), Some(8080));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge values in order, later values taking precedence.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}
