//! # Canonical Serialization
//!
//! `CanonicalBytes` is the only way token headers and payloads are turned
//! into bytes before base64url encoding. Serialization is RFC 8785 (JCS):
//! sorted keys, compact separators, deterministic output. Floats are
//! rejected because their JCS number formatting is not stable across
//! implementations.
//!
//! Verification never re-canonicalizes. The signed bytes are whatever bytes
//! were transmitted, so a token produced by a non-canonicalizing signer still
//! verifies.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by float-free JCS canonicalization.
///
/// The inner `Vec<u8>` is private; [`CanonicalBytes::new`] is the only
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// `FloatRejected` if the value contains a non-integer number,
    /// `SerializationFailed` if serde cannot represent it as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the owned bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(reject_floats),
        Value::Object(map) => map.values().try_for_each(reject_floats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_and_compact() {
        let cb = CanonicalBytes::new(&json!({"kid": "did:key:zX", "alg": "ES256"})).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"alg":"ES256","kid":"did:key:zX"}"#);
    }

    #[test]
    fn nested_objects_sorted() {
        let cb = CanonicalBytes::new(&json!({"b": {"z": 1, "a": [true, null]}, "a": "x"})).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"a":"x","b":{"a":[true,null],"z":1}}"#);
    }

    #[test]
    fn struct_field_order_does_not_matter() {
        #[derive(Serialize)]
        struct Header {
            zeta: u8,
            alpha: u8,
        }
        let cb = CanonicalBytes::new(&Header { zeta: 2, alpha: 1 }).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"alpha":1,"zeta":2}"#);
    }

    #[test]
    fn float_rejected() {
        let err = CanonicalBytes::new(&json!({"ratio": 0.5})).unwrap_err();
        assert!(matches!(err, CanonicalizationError::FloatRejected(f) if f == 0.5));
    }

    #[test]
    fn float_in_array_rejected() {
        assert!(CanonicalBytes::new(&json!([1, 2, 3.25])).is_err());
    }

    #[test]
    fn integers_accepted() {
        let cb = CanonicalBytes::new(&json!({"n": -7, "m": 4608})).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"m":4608,"n":-7}"#);
    }

    #[test]
    fn non_ascii_preserved() {
        let cb = CanonicalBytes::new(&json!({"claim": "年齢>=18"})).unwrap();
        assert_eq!(std::str::from_utf8(cb.as_bytes()).unwrap(), r#"{"claim":"年齢>=18"}"#);
    }
}
