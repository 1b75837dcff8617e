//! Defensive nested-field lookup over loosely populated FHIR JSON.
//!
//! AllergyIntolerance resources are routinely partially populated, so every
//! field read must tolerate a missing key, a wrong type, or an empty list at
//! any depth. All navigation goes through these helpers; a failed step
//! yields the empty default instead of an error.

use serde_json::Value;

const EMPTY: &[Value] = &[];

/// Walk `path` through nested objects, `None` on any missing or mistyped
/// step.
pub fn get_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

/// String at `path`, or `""` when absent or not a string.
pub fn str_at<'a>(value: &'a Value, path: &[&str]) -> &'a str {
    get_path(value, path).and_then(Value::as_str).unwrap_or("")
}

/// Single-key variant of [`str_at`].
pub fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Array at `path`, or the empty slice when absent or not an array.
pub fn array_at<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    get_path(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_path_walks_nested_objects() {
        let value = json!({"meta": {"lastUpdated": "2024-05-07"}});
        assert_eq!(
            get_path(&value, &["meta", "lastUpdated"]),
            Some(&json!("2024-05-07"))
        );
    }

    #[test]
    fn test_missing_step_yields_none() {
        let value = json!({"meta": {}});
        assert_eq!(get_path(&value, &["meta", "lastUpdated"]), None);
        assert_eq!(get_path(&value, &["note", "text"]), None);
    }

    #[test]
    fn test_mistyped_step_yields_default() {
        // "meta" is a string here, not an object
        let value = json!({"meta": "oops"});
        assert_eq!(str_at(&value, &["meta", "lastUpdated"]), "");
        assert_eq!(array_at(&value, &["meta", "coding"]), &[] as &[Value]);
    }

    #[test]
    fn test_str_at_non_string_yields_empty() {
        let value = json!({"id": 42});
        assert_eq!(str_at(&value, &["id"]), "");
    }

    #[test]
    fn test_array_at_returns_elements() {
        let value = json!({"category": ["food", "medication"]});
        assert_eq!(array_at(&value, &["category"]).len(), 2);
    }

    #[test]
    fn test_lookups_on_null_root() {
        assert_eq!(str_at(&Value::Null, &["id"]), "");
        assert!(array_at(&Value::Null, &["reaction"]).is_empty());
    }
}
