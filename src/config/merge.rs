//! Field-by-field merging of JSON configuration tiers.
//!
//! Higher tiers override lower tiers key by key. Arrays and scalars are
//! replaced entirely.

use serde_json::Value;

/// Merge `overlay` into `base` in place.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - `null` in overlay leaves the base value untouched ("not specified")
/// - Anything else replaces the base value
pub fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_into(existing, overlay_value),
                    None => {
                        if !overlay_value.is_null() {
                            base_map.insert(key, overlay_value);
                        }
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Merge two values, with `overlay` taking precedence over `base`.
///
/// # Example
/// ```
/// use serde_json::json;
/// use gvasp::config::deep_merge;
///
/// let base = json!({ "scheduler": "slurm", "log_dir": "/home/u/.gvasp/logs" });
/// let overlay = json!({ "log_dir": "/scratch/logs" });
/// let merged = deep_merge(base, overlay);
/// assert_eq!(merged, json!({ "scheduler": "slurm", "log_dir": "/scratch/logs" }));
/// ```
pub fn deep_merge(mut base: Value, overlay: Value) -> Value {
    merge_into(&mut base, overlay);
    base
}

/// Merge tiers in order, lowest priority first.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_overrides_single_field() {
        let defaults = json!({
            "config_dir": "/home/u/.gvasp",
            "scheduler": "slurm",
            "log_dir": "/home/u/.gvasp/logs"
        });
        let file = json!({"config_dir": "/opt/vasp-templates"});
        let result = deep_merge(defaults, file);
        assert_eq!(
            result,
            json!({
                "config_dir": "/opt/vasp-templates",
                "scheduler": "slurm",
                "log_dir": "/home/u/.gvasp/logs"
            })
        );
    }

    #[test]
    fn test_null_keeps_lower_tier() {
        let defaults = json!({"log_dir": "/home/u/.gvasp/logs"});
        let file = json!({"log_dir": null});
        assert_eq!(deep_merge(defaults.clone(), file), defaults);
    }

    #[test]
    fn test_null_for_missing_key_is_not_inserted() {
        let result = deep_merge(json!({"a": 1}), json!({"b": null}));
        assert_eq!(result, json!({"a": 1}));
    }

    #[test]
    fn test_nested_objects_merge() {
        let base = json!({"paths": {"incar": "INCAR", "uvalue": "UValue.yaml"}});
        let overlay = json!({"paths": {"incar": "INCAR.relax"}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"paths": {"incar": "INCAR.relax", "uvalue": "UValue.yaml"}})
        );
    }

    #[test]
    fn test_arrays_replaced_not_merged() {
        let result = deep_merge(json!({"elements": ["Ce", "O"]}), json!({"elements": ["Fe"]}));
        assert_eq!(result, json!({"elements": ["Fe"]}));
    }

    #[test]
    fn test_merge_all_later_tiers_win() {
        let tiers = vec![
            json!({"scheduler": "slurm", "log_dir": "/a"}),
            json!({"log_dir": "/b"}),
            json!({"log_dir": "/c", "potential": "PAW_PW91"}),
        ];
        assert_eq!(
            deep_merge_all(tiers),
            json!({"scheduler": "slurm", "log_dir": "/c", "potential": "PAW_PW91"})
        );
    }

    #[test]
    fn test_overlay_replaces_object_with_scalar() {
        let result = deep_merge(json!({"value": {"nested": true}}), json!({"value": 42}));
        assert_eq!(result, json!({"value": 42}));
    }
}
