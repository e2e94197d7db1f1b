//! # Cryptographic Error Types
//!
//! `CryptoError` covers key and signature primitives. `TokenError` carries
//! the compact-token taxonomy and separates "could not attempt verification"
//! from "attempted and failed". `KeyError` is the key-source failure class.

use std::fmt;

use didvc_core::error::{CanonicalizationError, IdentifierError};
use thiserror::Error;

use crate::keystore::KeyRole;

/// Errors from key and signature primitives.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Private scalar outside `[1, n-1]` or of an unusable length.
    #[error("invalid private scalar: {0}")]
    InvalidScalar(String),

    /// Signature bytes are not 64 bytes long.
    #[error("invalid signature length: expected 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// ECDSA signing failed.
    #[error("ECDSA signing failed: {0}")]
    SigningFailed(String),

    /// ECDSA verification failed.
    #[error("ECDSA verification failed: {0}")]
    VerificationFailed(String),
}

/// Which of the three token segments an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// First segment.
    Header,
    /// Second segment.
    Payload,
    /// Third segment.
    Signature,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Header => "header",
            Self::Payload => "payload",
            Self::Signature => "signature",
        })
    }
}

/// Errors from signing or verifying a compact signed token.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Token does not have exactly three `.`-separated segments.
    #[error("malformed token: expected 3 segments, got {0}")]
    MalformedToken(usize),

    /// A segment is not unpadded base64url.
    #[error("malformed {segment} encoding: {reason}")]
    MalformedEncoding {
        /// Offending segment.
        segment: Segment,
        /// Decoder message.
        reason: String,
    },

    /// Header bytes are not a `{"kid": ...}` object.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// `kid` cannot be turned into a P-256 public key.
    #[error("unresolvable signer: {0}")]
    UnresolvableSigner(#[source] IdentifierError),

    /// Signature did not verify over the signing input.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Header or payload could not be canonicalized for signing.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The signer could not produce a signature.
    #[error("signing failed: {0}")]
    Signing(#[source] CryptoError),
}

impl TokenError {
    /// Short taxonomy name of this error, suitable for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedToken(_) => "MalformedToken",
            Self::MalformedEncoding { .. } => "MalformedEncoding",
            Self::MalformedHeader(_) => "MalformedHeader",
            Self::UnresolvableSigner(_) => "UnresolvableSigner",
            Self::InvalidSignature(_) => "InvalidSignature",
            Self::Canonicalization(_) => "Canonicalization",
            Self::Signing(_) => "SigningFailed",
        }
    }

    /// True if verification was attempted and the signature check failed.
    ///
    /// False for every error raised before a public key was in hand.
    pub fn is_signature_failure(&self) -> bool {
        matches!(self, Self::InvalidSignature(_))
    }
}

/// The key source could not supply a key (`KeyUnavailable`).
#[derive(Error, Debug)]
pub enum KeyError {
    /// Reading or writing key material failed.
    #[error("key unavailable for role {role}: {source}")]
    Io {
        /// Role whose key was requested.
        role: KeyRole,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Stored key material is not a valid P-256 scalar.
    #[error("key unavailable for role {role}: stored key is corrupt: {source}")]
    Corrupt {
        /// Role whose key was requested.
        role: KeyRole,
        /// Validation failure.
        #[source]
        source: CryptoError,
    },
}

impl KeyError {
    /// Taxonomy name. Every key-source failure is `KeyUnavailable`.
    pub fn kind(&self) -> &'static str {
        "KeyUnavailable"
    }

    /// The role whose key could not be supplied.
    pub fn role(&self) -> KeyRole {
        match self {
            Self::Io { role, .. } | Self::Corrupt { role, .. } => *role,
        }
    }
}
