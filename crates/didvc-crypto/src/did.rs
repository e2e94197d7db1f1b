//! # did:key Resolution
//!
//! Curve half of the self-certifying identifier codec. Syntax, base58 and
//! tag checks run in `DidKey::parse`; this module adds the final step,
//! decompressing the 33 key bytes to a point on P-256.

use didvc_core::error::IdentifierError;
use didvc_core::DidKey;

use crate::keypair::P256PublicKey;

/// Derive the identifier of a public key. Total for any valid key.
pub fn did_from_public_key(public_key: &P256PublicKey) -> DidKey {
    let did = public_key.did();
    tracing::debug!(did = %did, "derived did:key");
    did
}

/// Recover the public key named by an identifier string.
///
/// # Errors
///
/// Any [`IdentifierError`], in the order documented on `DidKey::parse`,
/// followed by `InvalidPoint` if the key bytes are off the curve.
pub fn public_key_from_did(identifier: &str) -> Result<P256PublicKey, IdentifierError> {
    let did = DidKey::parse(identifier)?;
    resolve(&did)
}

/// Decompress the key carried by an already-parsed identifier.
pub fn resolve(did: &DidKey) -> Result<P256PublicKey, IdentifierError> {
    P256PublicKey::from_compressed(did.compressed_key())
}
