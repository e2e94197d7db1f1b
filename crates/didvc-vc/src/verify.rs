//! # Verification
//!
//! [`verify`] runs the token check, then classifies the payload by its
//! `type` marker and applies the structural rules of each payload kind:
//!
//! - the payload's `issuer` (credential) or `holder` (presentation) must be
//!   the header `kid`;
//! - a credential's `Start_Time` must not be after its `End_Time`;
//! - a presentation must carry at least one credential.
//!
//! Validity windows are not compared against the clock.

use didvc_core::DidKey;
use didvc_crypto::token;
use serde_json::Value;

use crate::credential::{VerifiableCredential, CREDENTIAL_TYPE};
use crate::error::VcError;
use crate::presentation::{VerifiablePresentation, PRESENTATION_TYPE};

/// A decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A `VerifiableCredential` payload.
    Credential(VerifiableCredential),
    /// A `VerifiablePresentation` payload.
    Presentation(VerifiablePresentation),
}

impl Payload {
    /// `VerifiableCredential` or `VerifiablePresentation`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Credential(_) => CREDENTIAL_TYPE,
            Self::Presentation(_) => PRESENTATION_TYPE,
        }
    }
}

/// A token that verified and whose payload passed structural checks.
#[derive(Debug, Clone)]
pub struct VerifiedPayload {
    /// Identifier of the signing key.
    pub signer: DidKey,
    /// Decoded payload, dispatched on its `type`.
    pub payload: Payload,
}

impl VerifiedPayload {
    /// The credential, if this is one.
    pub fn as_credential(&self) -> Option<&VerifiableCredential> {
        match &self.payload {
            Payload::Credential(c) => Some(c),
            Payload::Presentation(_) => None,
        }
    }

    /// The presentation, if this is one.
    pub fn as_presentation(&self) -> Option<&VerifiablePresentation> {
        match &self.payload {
            Payload::Presentation(p) => Some(p),
            Payload::Credential(_) => None,
        }
    }
}

/// Outcome for one credential embedded in a presentation.
#[derive(Debug)]
pub struct CredentialReport {
    /// Position in `verifiableCredential`.
    pub index: usize,
    /// The verified credential, or why it failed.
    pub outcome: Result<VerifiableCredential, VcError>,
}

impl CredentialReport {
    /// True when this credential verified.
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Verify a credential or presentation token.
///
/// # Errors
///
/// `Token` for anything the token engine rejects; `MalformedPayload`,
/// `SignerMismatch`, `InvalidValidity` or `EmptyPresentation` for a valid
/// signature over an unacceptable payload.
pub fn verify(token: &str) -> Result<VerifiedPayload, VcError> {
    let verified = token::verify(token)?;
    let signer = verified.signer_did().clone();

    let result = classify(verified.payload_bytes()).and_then(|payload| {
        check_payload(&signer, &payload)?;
        Ok(payload)
    });
    match result {
        Ok(payload) => {
            tracing::debug!(signer = %signer, kind = payload.type_name(), "payload verified");
            Ok(VerifiedPayload { signer, payload })
        }
        Err(e) => {
            tracing::warn!(signer = %signer, kind = e.kind(), error = %e, "payload rejected");
            Err(e)
        }
    }
}

/// Verify every credential token inside a presentation, independently and
/// in order.
///
/// An entry that verifies as a presentation rather than a credential is
/// reported as `MalformedPayload`.
pub fn verify_presentation_credentials(
    presentation: &VerifiablePresentation,
) -> Vec<CredentialReport> {
    presentation
        .credentials
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let outcome = verify(token).and_then(|v| match v.payload {
                Payload::Credential(c) => Ok(c),
                Payload::Presentation(_) => Err(VcError::MalformedPayload(
                    "expected a credential, found a presentation".to_string(),
                )),
            });
            CredentialReport { index, outcome }
        })
        .collect()
}

fn classify(bytes: &[u8]) -> Result<Payload, VcError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| VcError::MalformedPayload(format!("payload is not JSON: {e}")))?;

    let types: Vec<&str> = match value.get("type") {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(s)) => vec![s.as_str()],
        _ => Vec::new(),
    };
    let is_credential = types.contains(&CREDENTIAL_TYPE);
    let is_presentation = types.contains(&PRESENTATION_TYPE);

    match (is_credential, is_presentation) {
        (true, false) => serde_json::from_value(value)
            .map(Payload::Credential)
            .map_err(|e| VcError::MalformedPayload(format!("invalid credential: {e}"))),
        (false, true) => serde_json::from_value(value)
            .map(Payload::Presentation)
            .map_err(|e| VcError::MalformedPayload(format!("invalid presentation: {e}"))),
        (true, true) => Err(VcError::MalformedPayload(
            "payload claims to be both a credential and a presentation".to_string(),
        )),
        (false, false) => Err(VcError::MalformedPayload(format!(
            "type must contain {CREDENTIAL_TYPE:?} or {PRESENTATION_TYPE:?}"
        ))),
    }
}

fn check_payload(signer: &DidKey, payload: &Payload) -> Result<(), VcError> {
    let claimed = match payload {
        Payload::Credential(c) => {
            c.check_validity_window()?;
            &c.issuer
        }
        Payload::Presentation(p) => {
            if p.credentials.is_empty() {
                return Err(VcError::EmptyPresentation);
            }
            &p.holder
        }
    };
    if claimed != signer.as_str() {
        return Err(VcError::SignerMismatch {
            signer: signer.to_string(),
            claimed: claimed.clone(),
        });
    }
    Ok(())
}
