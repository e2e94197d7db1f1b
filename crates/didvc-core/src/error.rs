//! # Error Types
//!
//! Structured errors for the core codecs. Every variant maps to one entry of
//! the didvc error taxonomy so callers further up the stack can match on the
//! exact failure class instead of parsing messages.

use thiserror::Error;

/// Top-level error type for `didvc-core`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Identifier could not be parsed.
    #[error("identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    /// Timestamp text was rejected.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A varint tag prefix could not be read (`MalformedTag`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// Input ended before a byte without the continuation bit.
    #[error("varint truncated after {0} bytes")]
    Truncated(usize),

    /// The encoded value does not fit in 64 bits.
    #[error("varint overflows 64 bits")]
    Overflow,
}

/// Errors from parsing or resolving a `did:key` identifier.
///
/// Variants are ordered the way [`crate::DidKey::parse`] checks them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Scheme, method, multibase prefix or base58 body violation.
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(String),

    /// The multicodec prefix could not be decoded.
    #[error("malformed multicodec tag: {0}")]
    MalformedTag(#[from] TagError),

    /// The multicodec tag is not the P-256 public key tag.
    #[error("unsupported key type: multicodec 0x{0:x}")]
    UnsupportedKeyType(u64),

    /// The key bytes after the tag have the wrong length.
    #[error("malformed key: expected {expected} bytes, got {actual}")]
    MalformedKey {
        /// Required length of a compressed P-256 point.
        expected: usize,
        /// Length actually found.
        actual: usize,
    },

    /// The key bytes do not decompress to a point on the curve.
    #[error("invalid point: {0}")]
    InvalidPoint(String),
}

impl IdentifierError {
    /// Short taxonomy name of this error, suitable for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedIdentifier(_) => "MalformedIdentifier",
            Self::MalformedTag(_) => "MalformedTag",
            Self::UnsupportedKeyType(_) => "UnsupportedKeyType",
            Self::MalformedKey { .. } => "MalformedKey",
            Self::InvalidPoint(_) => "InvalidPoint",
        }
    }
}
