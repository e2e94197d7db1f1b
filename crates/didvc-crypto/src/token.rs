//! # Compact Signed Tokens
//!
//! A token is three unpadded base64url segments joined by `.`:
//!
//! ```text
//! b64url(header-json) . b64url(payload-json) . b64url(r ‖ s)
//! ```
//!
//! The header is `{"kid": "<did:key>"}` and nothing else. The payload is any
//! JSON value; this module never inspects it. The signature is ECDSA P-256
//! over `SHA-256(seg0 + "." + seg1)`, where `seg0` and `seg1` are the exact
//! transmitted characters.
//!
//! Signing serializes header and payload through [`CanonicalBytes`].
//! Verification hashes the transmitted text as-is and never re-serializes.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use didvc_core::{CanonicalBytes, DidKey};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::did;
use crate::error::{Segment, TokenError};
use crate::keypair::{P256KeyPair, P256PublicKey};
use crate::signature::{self, P256Signature};

/// Segment separator.
pub const SEPARATOR: char = '.';

/// Token header. Exactly one field.
///
/// `kid` is kept as text so that an unparseable identifier is reported as
/// `UnresolvableSigner` rather than `MalformedHeader`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenHeader {
    /// Identifier of the signing key.
    pub kid: String,
}

impl TokenHeader {
    /// Header naming `signer` as the key id.
    pub fn for_signer(signer: &P256KeyPair) -> Self {
        Self {
            kid: signer.did().to_string(),
        }
    }
}

/// A token whose signature has been checked.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    header: TokenHeader,
    signer_did: DidKey,
    signer: P256PublicKey,
    payload: Vec<u8>,
}

impl VerifiedToken {
    /// The decoded header.
    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    /// The parsed `kid`.
    pub fn signer_did(&self) -> &DidKey {
        &self.signer_did
    }

    /// The public key the signature verified under.
    pub fn signer(&self) -> &P256PublicKey {
        &self.signer
    }

    /// Raw payload bytes, exactly as transmitted.
    pub fn payload_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Decode the payload as JSON into `T`.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

/// Sign `payload` under `header` with `signer`.
///
/// Every call draws a fresh nonce, so two tokens over the same input differ
/// in their third segment.
///
/// # Errors
///
/// `Canonicalization` if either value cannot be serialized as float-free
/// JSON; `Signing` if ECDSA fails.
pub fn sign<P: Serialize>(
    header: &TokenHeader,
    payload: &P,
    signer: &P256KeyPair,
) -> Result<String, TokenError> {
    let header_bytes = CanonicalBytes::new(header)?;
    let payload_bytes = CanonicalBytes::new(payload)?;

    let mut token = URL_SAFE_NO_PAD.encode(header_bytes.as_bytes());
    token.push(SEPARATOR);
    token.push_str(&URL_SAFE_NO_PAD.encode(payload_bytes.as_bytes()));

    let digest = signing_digest(&token);
    let sig = signer.sign_digest(&digest).map_err(TokenError::Signing)?;

    token.push(SEPARATOR);
    token.push_str(&URL_SAFE_NO_PAD.encode(sig.as_bytes()));

    tracing::debug!(kid = %header.kid, payload_len = payload_bytes.len(), "signed token");
    Ok(token)
}

/// Verify a token and return its contents.
///
/// # Errors
///
/// In check order: `MalformedToken`, `MalformedEncoding`, `MalformedHeader`,
/// `UnresolvableSigner`, `InvalidSignature`. Only the last one means a
/// signature check actually ran.
pub fn verify(token: &str) -> Result<VerifiedToken, TokenError> {
    verify_inner(token).map_err(|e| {
        tracing::warn!(kind = e.kind(), error = %e, "token verification failed");
        e
    })
}

fn verify_inner(token: &str) -> Result<VerifiedToken, TokenError> {
    let segments: Vec<&str> = token.split(SEPARATOR).collect();
    let [seg0, seg1, seg2] = segments[..] else {
        return Err(TokenError::MalformedToken(segments.len()));
    };

    let header_bytes = decode_segment(seg0, Segment::Header)?;
    let payload = decode_segment(seg1, Segment::Payload)?;
    let sig_bytes = decode_segment(seg2, Segment::Signature)?;

    let header: TokenHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| TokenError::MalformedHeader(e.to_string()))?;

    let signer_did = DidKey::parse(&header.kid).map_err(TokenError::UnresolvableSigner)?;
    let signer = did::resolve(&signer_did).map_err(TokenError::UnresolvableSigner)?;

    let signing_input = &token[..seg0.len() + 1 + seg1.len()];
    let digest = signing_digest(signing_input);

    let sig = P256Signature::from_bytes(&sig_bytes)
        .map_err(|e| TokenError::InvalidSignature(e.to_string()))?;
    signature::verify_digest(&signer, &digest, &sig)
        .map_err(|e| TokenError::InvalidSignature(e.to_string()))?;

    Ok(VerifiedToken {
        header,
        signer_did,
        signer,
        payload,
    })
}

fn decode_segment(segment: &str, which: Segment) -> Result<Vec<u8>, TokenError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::MalformedEncoding {
            segment: which,
            reason: e.to_string(),
        })
}

fn signing_digest(signing_input: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(signing_input.as_bytes()));
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::Value;

    fn json_value_no_floats() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-(1i64 << 53)..(1i64 << 53)).prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ :./é\"\\\\]{0,40}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-zA-Z@]{1,10}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// Whatever sign produces, verify accepts, returning the same payload.
        #[test]
        fn verify_accepts_what_sign_produces(payload in json_value_no_floats()) {
            let kp = P256KeyPair::generate();
            let token = sign(&TokenHeader::for_signer(&kp), &payload, &kp).unwrap();

            let verified = verify(&token).unwrap();
            prop_assert_eq!(verified.signer_did(), &kp.did());
            prop_assert_eq!(verified.payload::<Value>().unwrap(), payload.clone());
            let expected = CanonicalBytes::new(&payload).unwrap();
            prop_assert_eq!(
                verified.payload_bytes(),
                expected.as_bytes()
            );
        }

        /// A token signed by one key never verifies under another key's kid.
        #[test]
        fn foreign_kid_rejected(payload in json_value_no_floats()) {
            let signer = P256KeyPair::generate();
            let other = P256KeyPair::generate();
            let token = sign(&TokenHeader::for_signer(&other), &payload, &signer).unwrap();
            let err = verify(&token).unwrap_err();
            prop_assert_eq!(err.kind(), "InvalidSignature");
        }
    }
}
