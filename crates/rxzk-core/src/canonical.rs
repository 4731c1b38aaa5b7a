//! # Canonical Serialization: JCS Byte Production
//!
//! Defines `CanonicalBytes`, the sole construction path for bytes that feed a
//! digest: circuit shape digests, verification-key fingerprints, mock proof
//! bindings and scenario report digests.
//!
//! ## Security Invariant
//!
//! The inner `Vec<u8>` is private. The only constructor serializes through
//! RFC 8785 (`serde_jcs`): sorted keys, compact separators, one byte sequence
//! per value. Two parties that agree on a value therefore agree on its digest.
//!
//! Field elements serialize as decimal strings, so floats never have a
//! legitimate reason to appear in a canonical document and are rejected.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - No float appears anywhere in the encoded document.
/// - Object keys are sorted, separators are compact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize `obj` (RFC 8785) after rejecting float values.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// float. Returns `CanonicalizationError::SerializationFailed` if JSON
    /// serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// The canonical encoding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the encoding is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_keys_and_compact_separators() {
        let data = serde_json::json!({"outcome": "1", "deltaMax": "60", "dataAge": "30"});
        let cb = CanonicalBytes::new(&data).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"dataAge":"30","deltaMax":"60","outcome":"1"}"#);
    }

    #[test]
    fn nested_objects_are_sorted() {
        let data = serde_json::json!({
            "ic": ["b", "a"],
            "key": {"z": 1, "a": 2}
        });
        let cb = CanonicalBytes::new(&data).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"ic":["b","a"],"key":{"a":2,"z":1}}"#);
    }

    #[test]
    fn float_rejected_at_any_depth() {
        let data = serde_json::json!({"records": [{"elapsed": 1.5}]});
        match CanonicalBytes::new(&data).unwrap_err() {
            CanonicalizationError::FloatRejected(f) => assert_eq!(f, 1.5),
            other => panic!("expected FloatRejected, got: {other}"),
        }
    }

    #[test]
    fn integers_accepted() {
        let data = serde_json::json!({"nPublic": 5});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"nPublic":5}"#);
        assert_eq!(cb.len(), 13);
        assert!(!cb.is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn canonicalization_is_deterministic(
            keys in prop::collection::btree_map("[a-zA-Z]{1,12}", "[0-9]{1,20}", 0..16)
        ) {
            let a = CanonicalBytes::new(&keys).unwrap();
            let b = CanonicalBytes::new(&keys).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
            prop_assert!(serde_json::from_slice::<Value>(a.as_bytes()).is_ok());
        }
    }
}
