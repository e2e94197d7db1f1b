//! # did:key Identifiers
//!
//! Textual half of the self-certifying identifier codec:
//!
//! ```text
//! did:key:z<base58btc(varint(0x1200) ‖ compressed-P256-point)>
//! ```
//!
//! [`DidKey::parse`] runs every check that needs no curve arithmetic, in a
//! fixed order, and stops at the first violation. Whether the 33 recovered
//! bytes are actually a point on P-256 is decided by
//! `didvc_crypto::did::public_key_from_did`.
//!
//! An identifier is a pure function of the public key. Nothing else
//! participates in its derivation and no private material survives it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdentifierError;
use crate::multicodec;

/// URI scheme token.
pub const DID_SCHEME: &str = "did";

/// DID method token.
pub const KEY_METHOD: &str = "key";

/// Multibase prefix for base58btc.
pub const BASE58BTC_PREFIX: char = 'z';

/// Length of a SEC1-compressed P-256 point.
pub const P256_COMPRESSED_LEN: usize = 33;

/// A syntactically valid `did:key` identifier carrying a compressed P-256 key.
///
/// Serializes as its string form. Deserialization runs [`DidKey::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DidKey {
    did: String,
    key: [u8; P256_COMPRESSED_LEN],
}

impl DidKey {
    /// Build the identifier for a compressed P-256 public key.
    ///
    /// The bytes are not checked for being on the curve. Callers holding a
    /// real key should go through `didvc_crypto::did::did_from_public_key`.
    pub fn from_compressed_p256(key: &[u8; P256_COMPRESSED_LEN]) -> Self {
        let tagged = multicodec::encode(multicodec::P256_PUB, key);
        let encoded = bs58::encode(tagged).into_string();
        Self {
            did: format!("{DID_SCHEME}:{KEY_METHOD}:{BASE58BTC_PREFIX}{encoded}"),
            key: *key,
        }
    }

    /// Parse an identifier string.
    ///
    /// # Errors
    ///
    /// In check order:
    /// 1. not exactly three `:`-separated parts → `MalformedIdentifier`
    /// 2. scheme is not `did` → `MalformedIdentifier`
    /// 3. method is not `key` → `MalformedIdentifier`
    /// 4. empty id or missing `z` prefix → `MalformedIdentifier`
    /// 5. invalid base58 → `MalformedIdentifier`
    /// 6. unreadable tag → `MalformedTag`; tag other than `0x1200` → `UnsupportedKeyType`
    /// 7. key not 33 bytes → `MalformedKey`
    pub fn parse(s: &str) -> Result<Self, IdentifierError> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(IdentifierError::MalformedIdentifier(format!(
                "expected 3 colon-separated parts, got {}",
                parts.len()
            )));
        }
        if parts[0] != DID_SCHEME {
            return Err(IdentifierError::MalformedIdentifier(format!(
                "scheme must be {DID_SCHEME:?}, got {:?}",
                parts[0]
            )));
        }
        if parts[1] != KEY_METHOD {
            return Err(IdentifierError::MalformedIdentifier(format!(
                "method must be {KEY_METHOD:?}, got {:?}",
                parts[1]
            )));
        }

        let id = parts[2];
        if id.is_empty() {
            return Err(IdentifierError::MalformedIdentifier(
                "method-specific id must not be empty".to_string(),
            ));
        }
        let Some(body) = id.strip_prefix(BASE58BTC_PREFIX) else {
            return Err(IdentifierError::MalformedIdentifier(format!(
                "method-specific id must start with multibase prefix {BASE58BTC_PREFIX:?}"
            )));
        };

        let decoded = bs58::decode(body).into_vec().map_err(|e| {
            IdentifierError::MalformedIdentifier(format!("invalid base58btc body: {e}"))
        })?;

        let (tag, key_bytes) = multicodec::decode(&decoded)?;
        if tag != multicodec::P256_PUB {
            return Err(IdentifierError::UnsupportedKeyType(tag));
        }

        let key: [u8; P256_COMPRESSED_LEN] =
            key_bytes
                .try_into()
                .map_err(|_| IdentifierError::MalformedKey {
                    expected: P256_COMPRESSED_LEN,
                    actual: key_bytes.len(),
                })?;

        Ok(Self {
            did: s.to_string(),
            key,
        })
    }

    /// The full identifier string.
    pub fn as_str(&self) -> &str {
        &self.did
    }

    /// The compressed public key bytes carried by the identifier.
    pub fn compressed_key(&self) -> &[u8; P256_COMPRESSED_LEN] {
        &self.key
    }

    /// The part after `did:key:`, multibase prefix included.
    pub fn method_specific_id(&self) -> &str {
        &self.did[DID_SCHEME.len() + KEY_METHOD.len() + 2..]
    }
}

impl fmt::Display for DidKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.did)
    }
}

impl FromStr for DidKey {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for DidKey {
    fn as_ref(&self) -> &str {
        &self.did
    }
}

impl Serialize for DidKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.did)
    }
}

impl<'de> Deserialize<'de> for DidKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TagError;

    fn sample_key() -> [u8; P256_COMPRESSED_LEN] {
        let mut key = [0x5au8; P256_COMPRESSED_LEN];
        key[0] = 0x02;
        key
    }

    fn did_from_raw(tagged: &[u8]) -> String {
        format!("did:key:z{}", bs58::encode(tagged).into_string())
    }

    #[test]
    fn format_has_p256_prefix() {
        let did = DidKey::from_compressed_p256(&sample_key());
        // varint(0x1200) = 0x80 0x24 always base58-encodes to a "zDn" lead.
        assert!(did.as_str().starts_with("did:key:zDn"), "{did}");
        assert!(did.method_specific_id().starts_with('z'));
    }

    #[test]
    fn parse_recovers_key_bytes() {
        let did = DidKey::from_compressed_p256(&sample_key());
        let parsed = DidKey::parse(did.as_str()).unwrap();
        assert_eq!(parsed.compressed_key(), &sample_key());
        assert_eq!(parsed, did);
    }

    #[test]
    fn wrong_part_count_rejected() {
        for s in ["did:key", "did:key:z:extra", "", "didkeyz"] {
            let err = DidKey::parse(s).unwrap_err();
            assert!(matches!(err, IdentifierError::MalformedIdentifier(_)), "{s}: {err}");
        }
    }

    #[test]
    fn wrong_scheme_rejected() {
        let did = DidKey::from_compressed_p256(&sample_key());
        let bad = did.as_str().replacen("did:", "notdid:", 1);
        let err = DidKey::parse(&bad).unwrap_err();
        assert!(matches!(err, IdentifierError::MalformedIdentifier(ref m) if m.contains("scheme")));
    }

    #[test]
    fn wrong_method_rejected() {
        let did = DidKey::from_compressed_p256(&sample_key());
        let bad = did.as_str().replacen(":key:", ":notkey:", 1);
        let err = DidKey::parse(&bad).unwrap_err();
        assert!(matches!(err, IdentifierError::MalformedIdentifier(ref m) if m.contains("method")));
    }

    #[test]
    fn empty_id_rejected() {
        let err = DidKey::parse("did:key:").unwrap_err();
        assert!(matches!(err, IdentifierError::MalformedIdentifier(ref m) if m.contains("empty")));
    }

    #[test]
    fn missing_multibase_prefix_rejected() {
        let did = DidKey::from_compressed_p256(&sample_key());
        let bad = did.as_str().replacen(":z", ":f", 1);
        let err = DidKey::parse(&bad).unwrap_err();
        assert!(matches!(err, IdentifierError::MalformedIdentifier(ref m) if m.contains("prefix")));
    }

    #[test]
    fn invalid_base58_rejected() {
        // '0', 'O', 'I' and 'l' are outside the bitcoin alphabet.
        let err = DidKey::parse("did:key:z0OIl").unwrap_err();
        assert!(matches!(err, IdentifierError::MalformedIdentifier(ref m) if m.contains("base58")));
    }

    #[test]
    fn empty_body_is_malformed_tag() {
        let err = DidKey::parse("did:key:z").unwrap_err();
        assert_eq!(err, IdentifierError::MalformedTag(TagError::Truncated(0)));
    }

    #[test]
    fn ed25519_tag_rejected() {
        let tagged = multicodec::encode(0xed, &[7u8; 32]);
        let err = DidKey::parse(&did_from_raw(&tagged)).unwrap_err();
        assert_eq!(err, IdentifierError::UnsupportedKeyType(0xed));
    }

    #[test]
    fn secp256k1_tag_rejected() {
        let tagged = multicodec::encode(0xe7, &sample_key());
        let err = DidKey::parse(&did_from_raw(&tagged)).unwrap_err();
        assert_eq!(err, IdentifierError::UnsupportedKeyType(0xe7));
        assert_eq!(err.kind(), "UnsupportedKeyType");
    }

    #[test]
    fn short_key_rejected() {
        let tagged = multicodec::encode(multicodec::P256_PUB, &[0x02; 32]);
        let err = DidKey::parse(&did_from_raw(&tagged)).unwrap_err();
        assert_eq!(
            err,
            IdentifierError::MalformedKey {
                expected: 33,
                actual: 32
            }
        );
    }

    #[test]
    fn uncompressed_length_rejected() {
        let mut uncompressed = vec![0x04];
        uncompressed.extend_from_slice(&[0x11; 64]);
        let tagged = multicodec::encode(multicodec::P256_PUB, &uncompressed);
        let err = DidKey::parse(&did_from_raw(&tagged)).unwrap_err();
        assert_eq!(err.kind(), "MalformedKey");
    }

    #[test]
    fn serde_as_string() {
        let did = DidKey::from_compressed_p256(&sample_key());
        let json = serde_json::to_string(&did).unwrap();
        assert_eq!(json, format!("\"{did}\""));
        let back: DidKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, did);
    }

    #[test]
    fn serde_rejects_invalid() {
        let result: Result<DidKey, _> = serde_json::from_str("\"did:web:example.com\"");
        assert!(result.is_err());
    }

    #[test]
    fn from_str_matches_parse() {
        let did = DidKey::from_compressed_p256(&sample_key());
        let parsed: DidKey = did.as_str().parse().unwrap();
        assert_eq!(parsed, did);
    }
}
