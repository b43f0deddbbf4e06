//! Canonical JSON for artifact hashing
//!
//! Object keys are sorted recursively and output is compact, so the same
//! artifact always hashes to the same blake3 digest regardless of how the
//! file on disk was formatted.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanonicalError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Serialize a value to canonical JSON (sorted keys, no whitespace)
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let json_value = serde_json::to_value(value)
        .map_err(|e| CanonicalError::SerializationError(e.to_string()))?;
    serde_json::to_string(&canonicalize_value(json_value))
        .map_err(|e| CanonicalError::SerializationError(e.to_string()))
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k, canonicalize_value(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}

/// Blake3 hash of the canonical JSON representation, hex-encoded
pub fn hash_canonical_hex<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let json = to_canonical_json(value)?;
    Ok(hex::encode(blake3::hash(json.as_bytes()).as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        b_field: i64,
        a_field: i64,
        nested: Inner,
    }

    #[derive(Serialize)]
    struct Inner {
        z: i64,
        a: i64,
    }

    fn sample(b: i64) -> Sample {
        Sample {
            b_field: b,
            a_field: 1,
            nested: Inner { z: 2, a: 3 },
        }
    }

    #[test]
    fn test_keys_sorted_and_compact() {
        let json = to_canonical_json(&sample(2)).unwrap();
        assert_eq!(json, r#"{"a_field":1,"b_field":2,"nested":{"a":3,"z":2}}"#);
    }

    #[test]
    fn test_hash_tracks_content() {
        let h1 = hash_canonical_hex(&sample(2)).unwrap();
        let h2 = hash_canonical_hex(&sample(2)).unwrap();
        let h3 = hash_canonical_hex(&sample(3)).unwrap();
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert_eq!(h1.len(), 64);
    }
}
