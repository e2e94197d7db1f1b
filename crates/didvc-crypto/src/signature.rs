//! # Fixed-Width ECDSA Signatures
//!
//! A signature is `r ‖ s`, each scalar left-padded to 32 bytes. Splitting
//! the decoded bytes exactly in half therefore always recovers the scalars,
//! even when one of them has leading zero bytes.

use std::fmt;

use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::Signature;

use crate::error::CryptoError;
use crate::keypair::P256PublicKey;

/// Byte length of an encoded signature.
pub const SIGNATURE_LEN: usize = 64;

/// Byte length of each scalar component.
pub const COMPONENT_LEN: usize = SIGNATURE_LEN / 2;

/// A P-256 ECDSA signature as fixed-width `r ‖ s`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct P256Signature([u8; SIGNATURE_LEN]);

impl P256Signature {
    /// Wrap raw signature bytes.
    ///
    /// # Errors
    ///
    /// `CryptoError::InvalidSignatureLength` unless exactly 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; SIGNATURE_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureLength(bytes.len()))?;
        Ok(Self(arr))
    }

    pub(crate) fn from_ecdsa(signature: &Signature) -> Self {
        let mut out = [0u8; SIGNATURE_LEN];
        out.copy_from_slice(&signature.to_bytes());
        Self(out)
    }

    /// The raw 64 bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// The `r` component, big-endian.
    pub fn r(&self) -> &[u8] {
        &self.0[..COMPONENT_LEN]
    }

    /// The `s` component, big-endian.
    pub fn s(&self) -> &[u8] {
        &self.0[COMPONENT_LEN..]
    }
}

impl fmt::Debug for P256Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.iter().take(4).map(|b| format!("{b:02x}")).collect();
        write!(f, "P256Signature({prefix}...)")
    }
}

/// Verify a signature over a SHA-256 digest.
///
/// Returns `Ok(())` if valid. Zero or out-of-range scalars and a failed
/// ECDSA equation are both `CryptoError::VerificationFailed`.
pub fn verify_digest(
    public_key: &P256PublicKey,
    digest: &[u8; 32],
    signature: &P256Signature,
) -> Result<(), CryptoError> {
    let sig = Signature::from_slice(&signature.0)
        .map_err(|_| CryptoError::VerificationFailed("r or s out of range".to_string()))?;
    public_key
        .verifying_key()
        .verify_prehash(digest, &sig)
        .map_err(|_| CryptoError::VerificationFailed("signature does not match".to_string()))
}
