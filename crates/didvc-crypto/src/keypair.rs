//! # P-256 Key Pairs
//!
//! `P256KeyPair` wraps an ECDSA signing key; `P256PublicKey` wraps the
//! matching verifying key and converts to and from the 33-byte SEC1
//! compressed form carried inside `did:key` identifiers.
//!
//! ## Security Invariant
//!
//! - A key pair is either freshly generated from the OS RNG or rebuilt from a
//!   raw scalar that has been range-checked to `[1, n-1]`. The public point
//!   is always recomputed as `scalar · G`, never accepted from outside.
//! - `P256KeyPair` does not implement `Serialize`; its `Debug` output is
//!   redacted. Exported scalar bytes are wrapped in `Zeroizing`.

use std::fmt;

use didvc_core::error::IdentifierError;
use didvc_core::identity::P256_COMPRESSED_LEN;
use didvc_core::DidKey;
use p256::ecdsa::signature::hazmat::RandomizedPrehashSigner;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::FieldBytes;
use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::signature::P256Signature;

/// Byte length of a P-256 private scalar.
pub const SCALAR_LEN: usize = 32;

/// A P-256 public key.
#[derive(Clone)]
pub struct P256PublicKey(VerifyingKey);

/// A P-256 key pair for signing.
#[derive(Clone)]
pub struct P256KeyPair {
    signing_key: SigningKey,
}

// ---------------------------------------------------------------------------
// P256PublicKey impls
// ---------------------------------------------------------------------------

impl P256PublicKey {
    /// Decompress a SEC1 compressed point.
    ///
    /// # Errors
    ///
    /// `IdentifierError::InvalidPoint` if the bytes are not a point on P-256.
    pub fn from_compressed(bytes: &[u8; P256_COMPRESSED_LEN]) -> Result<Self, IdentifierError> {
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(IdentifierError::InvalidPoint(format!(
                "SEC1 compressed tag must be 0x02 or 0x03, got 0x{:02x}",
                bytes[0]
            )));
        }
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| IdentifierError::InvalidPoint("point is not on P-256".to_string()))
    }

    /// The 33-byte SEC1 compressed encoding.
    pub fn to_compressed(&self) -> [u8; P256_COMPRESSED_LEN] {
        let point = self.0.to_encoded_point(true);
        let mut out = [0u8; P256_COMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// The `did:key` identifier of this key.
    pub fn did(&self) -> DidKey {
        DidKey::from_compressed_p256(&self.to_compressed())
    }

    /// Access the underlying verifying key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }
}

impl PartialEq for P256PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed()
    }
}

impl Eq for P256PublicKey {}

impl fmt::Debug for P256PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self
            .to_compressed()
            .iter()
            .take(5)
            .map(|b| format!("{b:02x}"))
            .collect();
        write!(f, "P256PublicKey({prefix}...)")
    }
}

// ---------------------------------------------------------------------------
// P256KeyPair impls
// ---------------------------------------------------------------------------

impl P256KeyPair {
    /// Generate a new random key pair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Rebuild a key pair from raw big-endian scalar bytes.
    ///
    /// Inputs shorter than 32 bytes are left-padded with zeros, which accepts
    /// minimal big-endian encodings written by other tools.
    ///
    /// # Errors
    ///
    /// `CryptoError::InvalidScalar` if the input is empty, longer than 32
    /// bytes, zero, or not below the group order.
    pub fn from_scalar_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.is_empty() || bytes.len() > SCALAR_LEN {
            return Err(CryptoError::InvalidScalar(format!(
                "expected 1..={SCALAR_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut padded = Zeroizing::new([0u8; SCALAR_LEN]);
        padded[SCALAR_LEN - bytes.len()..].copy_from_slice(bytes);

        let signing_key = SigningKey::from_bytes(FieldBytes::from_slice(&padded[..]))
            .map_err(|_| CryptoError::InvalidScalar("scalar must lie in [1, n-1]".to_string()))?;
        Ok(Self { signing_key })
    }

    /// The private scalar as 32 big-endian bytes.
    pub fn scalar_bytes(&self) -> Zeroizing<[u8; SCALAR_LEN]> {
        let mut out = Zeroizing::new([0u8; SCALAR_LEN]);
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    /// The public key `scalar · G`.
    pub fn public_key(&self) -> P256PublicKey {
        P256PublicKey(VerifyingKey::from(&self.signing_key))
    }

    /// The `did:key` identifier of this key pair's public key.
    pub fn did(&self) -> DidKey {
        self.public_key().did()
    }

    /// Sign a 32-byte SHA-256 digest.
    ///
    /// The nonce is derived per call from fresh OS randomness mixed into
    /// RFC 6979, so signing the same digest twice yields different
    /// signatures.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<P256Signature, CryptoError> {
        let signature: Signature = self
            .signing_key
            .sign_prehash_with_rng(&mut OsRng, digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(P256Signature::from_ecdsa(&signature))
    }
}

impl fmt::Debug for P256KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P256KeyPair(<private>)")
    }
}
