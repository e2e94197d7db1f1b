//! # Protocol Error Types
//!
//! `VcError` keeps cryptographic failures (`Token`) apart from payload
//! problems (`MalformedPayload`, `EmptyPresentation`, `SignerMismatch`,
//! `InvalidValidity`) so a caller can tell "bad signature" from "good
//! signature over a bad document".

use didvc_crypto::{KeyError, TokenError};
use thiserror::Error;

/// Errors from issuance, presentation and verification.
#[derive(Error, Debug)]
pub enum VcError {
    /// The token itself failed to sign or verify.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The key provider could not supply a key.
    #[error(transparent)]
    KeyUnavailable(#[from] KeyError),

    /// A presentation must carry at least one credential token.
    #[error("presentation must contain at least one credential")]
    EmptyPresentation,

    /// The payload verified but is not a credential or presentation.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The payload names a different party than the token signer.
    #[error("signer mismatch: token signed by {signer}, payload claims {claimed}")]
    SignerMismatch {
        /// `kid` from the token header.
        signer: String,
        /// `issuer` or `holder` from the payload.
        claimed: String,
    },

    /// Validity window is inverted or not representable.
    #[error("invalid validity window: {0}")]
    InvalidValidity(String),

    /// The record store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl VcError {
    /// Short taxonomy name of this error, suitable for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Token(e) => e.kind(),
            Self::KeyUnavailable(e) => e.kind(),
            Self::EmptyPresentation => "EmptyPresentation",
            Self::MalformedPayload(_) => "MalformedPayload",
            Self::SignerMismatch { .. } => "SignerMismatch",
            Self::InvalidValidity(_) => "InvalidValidity",
            Self::Store(e) => e.kind(),
        }
    }

    /// True if a signature check ran and failed.
    pub fn is_signature_failure(&self) -> bool {
        matches!(self, Self::Token(e) if e.is_signature_failure())
    }
}

/// Errors from a credential record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A record with this name already exists.
    #[error("credential name {0:?} is already in use")]
    Conflict(String),

    /// The backing storage failed.
    #[error("record store failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Taxonomy name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "Conflict",
            Self::Backend(_) => "StoreUnavailable",
        }
    }
}
