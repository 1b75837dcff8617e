//! Bundle loading - one file in, the `entry` array out.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Errors reading or parsing a bundle file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be read.
    #[error("failed to read bundle file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("bundle file is not valid JSON")]
    Parse(#[from] serde_json::Error),
}

/// Read a bundle file and return its top-level `entry` array.
///
/// A bundle without an `entry` key (or with a non-array one) yields an
/// empty list. One-shot batch read, no retries.
pub fn load_entries(path: &Path) -> Result<Vec<Value>, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_entries(bytes)
}

/// Parse bundle bytes and pull out the `entry` array.
///
/// Tries simd-json first, falling back to serde_json, which also produces
/// the authoritative error for invalid input. simd-json parses in place, so
/// the fallback gets its own untouched copy of the bytes.
pub fn parse_entries(bytes: Vec<u8>) -> Result<Vec<Value>, LoadError> {
    let mut simd_buf = bytes.clone();
    let document: Value = match simd_json::serde::from_slice(&mut simd_buf) {
        Ok(document) => document,
        Err(_) => serde_json::from_slice(&bytes)?,
    };

    match document {
        Value::Object(mut bundle) => match bundle.remove("entry") {
            Some(Value::Array(entries)) => Ok(entries),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bytes_of(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_entries_are_returned_in_order() {
        let bundle = json!({
            "resourceType": "Bundle",
            "entry": [
                {"resource": {"id": "a"}},
                {"resource": {"id": "b"}}
            ]
        });
        let entries = parse_entries(bytes_of(bundle)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["resource"]["id"], "a");
        assert_eq!(entries[1]["resource"]["id"], "b");
    }

    #[test]
    fn test_missing_entry_key_yields_empty() {
        let entries = parse_entries(bytes_of(json!({"resourceType": "Bundle"}))).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_non_array_entry_yields_empty() {
        let entries = parse_entries(bytes_of(json!({"entry": "not-a-list"}))).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let result = parse_entries(b"{not json".to_vec());
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = load_entries(Path::new("/nonexistent/bundle.json"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_non_ascii_content_survives_parsing() {
        let bundle = json!({"entry": [{"resource": {"id": "충북대"}}]});
        let entries = parse_entries(bytes_of(bundle)).unwrap();
        assert_eq!(entries[0]["resource"]["id"], "충북대");
    }
}
