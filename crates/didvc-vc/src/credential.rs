//! # Credential Issuance
//!
//! A credential is a compact signed token whose payload is:
//!
//! ```json
//! {
//!   "@context": ["https://www.w3.org/2018/credentials/v1"],
//!   "type": ["VerifiableCredential"],
//!   "issuer": "did:key:zDn...",
//!   "Start_Time": "2026-01-01T00:00:00Z",
//!   "End_Time": "2027-01-01T00:00:00Z",
//!   "credentialSubject": {"id": "...", "claim": "...", "holder": "..."}
//! }
//! ```
//!
//! and whose header `kid` is the issuer identifier. The validity window is
//! recorded but never enforced.

use chrono::Duration;
use didvc_core::{DidKey, Timestamp};
use didvc_crypto::token::{self, TokenHeader};
use didvc_crypto::P256KeyPair;
use serde::{Deserialize, Serialize};

use crate::error::VcError;

/// JSON-LD context written into every payload.
pub const CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// `type` marker of a credential payload.
pub const CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// Default validity window length in days.
pub const DEFAULT_VALIDITY_DAYS: i64 = 365;

/// What the issuer asserts, before the holder is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectClaim {
    /// Subject identifier. Also the record name.
    pub id: String,
    /// Free-text claim.
    pub claim: String,
}

impl SubjectClaim {
    /// Claim `claim` about subject `id`.
    pub fn new(id: impl Into<String>, claim: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            claim: claim.into(),
        }
    }
}

/// `credentialSubject` of a credential payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSubject {
    /// Subject identifier.
    pub id: String,
    /// Free-text claim.
    pub claim: String,
    /// Holder the credential was issued to.
    pub holder: String,
}

/// Credential payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiableCredential {
    /// JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Type markers. Contains [`CREDENTIAL_TYPE`].
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Issuer identifier. Must equal the token's `kid`.
    pub issuer: String,

    /// Start of the validity window.
    #[serde(rename = "Start_Time")]
    pub start_time: Timestamp,

    /// End of the validity window.
    #[serde(rename = "End_Time")]
    pub end_time: Timestamp,

    /// Subject, claim and holder.
    #[serde(rename = "credentialSubject")]
    pub subject: CredentialSubject,
}

impl VerifiableCredential {
    /// Build a payload for `issuer` valid over `[start, end]`.
    pub fn new(
        issuer: &DidKey,
        subject: &SubjectClaim,
        holder: &str,
        start_time: Timestamp,
        end_time: Timestamp,
    ) -> Self {
        Self {
            context: vec![CREDENTIALS_CONTEXT.to_string()],
            types: vec![CREDENTIAL_TYPE.to_string()],
            issuer: issuer.to_string(),
            start_time,
            end_time,
            subject: CredentialSubject {
                id: subject.id.clone(),
                claim: subject.claim.clone(),
                holder: holder.to_string(),
            },
        }
    }

    /// Check that the window is not inverted.
    pub fn check_validity_window(&self) -> Result<(), VcError> {
        if self.start_time > self.end_time {
            return Err(VcError::InvalidValidity(format!(
                "Start_Time {} is after End_Time {}",
                self.start_time, self.end_time
            )));
        }
        Ok(())
    }
}

/// Result of a successful issuance.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    /// The signed token.
    pub token: String,
    /// Identifier of the issuing key.
    pub issuer: DidKey,
    /// The payload that was signed.
    pub credential: VerifiableCredential,
}

/// Issue a credential starting now.
pub fn issue(
    subject: &SubjectClaim,
    holder: &str,
    issuer_key: &P256KeyPair,
    validity: Duration,
) -> Result<IssuedCredential, VcError> {
    issue_at(subject, holder, issuer_key, validity, Timestamp::now())
}

/// Issue a credential with an explicit start time.
///
/// # Errors
///
/// `InvalidValidity` if `validity` is negative or `now + validity` is out
/// of range; `Token` if signing fails.
pub fn issue_at(
    subject: &SubjectClaim,
    holder: &str,
    issuer_key: &P256KeyPair,
    validity: Duration,
    now: Timestamp,
) -> Result<IssuedCredential, VcError> {
    let end = now.checked_add(validity).ok_or_else(|| {
        VcError::InvalidValidity(format!("{now} + {validity} is out of range"))
    })?;

    let issuer = issuer_key.did();
    let credential = VerifiableCredential::new(&issuer, subject, holder, now, end);
    credential.check_validity_window()?;

    let header = TokenHeader {
        kid: issuer.to_string(),
    };
    let token = token::sign(&header, &credential, issuer_key)?;

    tracing::info!(issuer = %issuer, subject = %subject.id, "issued credential");
    Ok(IssuedCredential {
        token,
        issuer,
        credential,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> Timestamp {
        Timestamp::parse("2026-03-01T09:30:00Z").unwrap()
    }

    #[test]
    fn payload_uses_wire_names() {
        let kp = P256KeyPair::generate();
        let subject = SubjectClaim::new("cred-1", "over 18");
        let cred = VerifiableCredential::new(&kp.did(), &subject, "bob", fixed_now(), fixed_now());
        let value = serde_json::to_value(&cred).unwrap();

        assert_eq!(value["@context"][0], CREDENTIALS_CONTEXT);
        assert_eq!(value["type"][0], CREDENTIAL_TYPE);
        assert_eq!(value["issuer"], kp.did().to_string());
        assert_eq!(value["Start_Time"], "2026-03-01T09:30:00Z");
        assert_eq!(value["credentialSubject"]["id"], "cred-1");
        assert_eq!(value["credentialSubject"]["holder"], "bob");
    }

    #[test]
    fn issue_at_sets_window() {
        let kp = P256KeyPair::generate();
        let issued = issue_at(
            &SubjectClaim::new("cred-1", "over 18"),
            "bob",
            &kp,
            Duration::days(DEFAULT_VALIDITY_DAYS),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(issued.issuer, kp.did());
        assert_eq!(issued.credential.start_time.to_rfc3339(), "2026-03-01T09:30:00Z");
        assert_eq!(issued.credential.end_time.to_rfc3339(), "2027-03-01T09:30:00Z");
        assert_eq!(issued.token.split('.').count(), 3);
    }

    #[test]
    fn issue_token_verifies_under_issuer() {
        let kp = P256KeyPair::generate();
        let issued = issue(&SubjectClaim::new("a", "b"), "c", &kp, Duration::days(1)).unwrap();
        let verified = token::verify(&issued.token).unwrap();
        assert_eq!(verified.signer_did(), &kp.did());
        let back: VerifiableCredential = verified.payload().unwrap();
        assert_eq!(back, issued.credential);
    }

    #[test]
    fn zero_validity_is_allowed() {
        let kp = P256KeyPair::generate();
        let issued = issue_at(&SubjectClaim::new("a", "b"), "c", &kp, Duration::zero(), fixed_now())
            .unwrap();
        assert_eq!(issued.credential.start_time, issued.credential.end_time);
    }

    #[test]
    fn negative_validity_rejected() {
        let kp = P256KeyPair::generate();
        let err = issue_at(
            &SubjectClaim::new("a", "b"),
            "c",
            &kp,
            Duration::days(-1),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "InvalidValidity");
    }

    #[test]
    fn inverted_window_detected() {
        let kp = P256KeyPair::generate();
        let end = fixed_now();
        let start = end.checked_add(Duration::seconds(1)).unwrap();
        let cred = VerifiableCredential::new(&kp.did(), &SubjectClaim::new("a", "b"), "c", start, end);
        assert!(cred.check_validity_window().is_err());
    }
}
