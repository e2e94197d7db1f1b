//! # End-to-End Issuance Tests
//!
//! Issuer key → did:key → credential token → verification from the token
//! alone, with no shared state between issuer and verifier.

use std::sync::Arc;

use chrono::Duration;
use didvc_core::Timestamp;
use didvc_crypto::{public_key_from_did, InMemoryKeyProvider, KeyProvider, KeyRole, P256KeyPair};
use didvc_vc::credential::{issue_at, SubjectClaim, DEFAULT_VALIDITY_DAYS};
use didvc_vc::verify::verify;
use didvc_vc::{CredentialIssuer, InMemoryCredentialStore, Payload};

// ---------------------------------------------------------------------------
// 1. Issue and verify
// ---------------------------------------------------------------------------

#[test]
fn issued_credential_verifies_with_no_shared_state() {
    let issuer_key = P256KeyPair::generate();
    let now = Timestamp::parse("2026-05-10T12:00:00Z").unwrap();
    let issued = issue_at(
        &SubjectClaim::new("employee-42", "works at ACME"),
        "did:key:zDnExampleHolder",
        &issuer_key,
        Duration::days(DEFAULT_VALIDITY_DAYS),
        now,
    )
    .unwrap();

    // The verifier only has the token string.
    let verified = verify(&issued.token).unwrap();
    assert_eq!(verified.signer, issuer_key.did());

    let Payload::Credential(cred) = verified.payload else {
        panic!("expected a credential");
    };
    assert_eq!(cred.issuer, issuer_key.did().to_string());
    assert_eq!(cred.subject.id, "employee-42");
    assert_eq!(cred.subject.claim, "works at ACME");
    assert_eq!(cred.subject.holder, "did:key:zDnExampleHolder");
    assert_eq!(cred.start_time.to_rfc3339(), "2026-05-10T12:00:00Z");
    assert_eq!(cred.end_time.to_rfc3339(), "2027-05-10T12:00:00Z");
}

#[test]
fn issuer_did_resolves_to_issuer_key() {
    let issuer_key = P256KeyPair::generate();
    let issued = didvc_vc::credential::issue(
        &SubjectClaim::new("n", "c"),
        "h",
        &issuer_key,
        Duration::days(1),
    )
    .unwrap();
    let pk = public_key_from_did(issued.issuer.as_str()).unwrap();
    assert_eq!(pk, issuer_key.public_key());
}

// ---------------------------------------------------------------------------
// 2. Through the issuer service
// ---------------------------------------------------------------------------

#[test]
fn service_records_match_tokens() {
    let keys = Arc::new(InMemoryKeyProvider::new());
    let issuer = CredentialIssuer::new(keys.clone(), Arc::new(InMemoryCredentialStore::new()));

    for (name, claim) in [("a", "first"), ("b", "second"), ("c", "third")] {
        issuer.issue(name, claim, "holder").unwrap();
    }
    let records = issuer.list().unwrap();
    assert_eq!(records.len(), 3);

    let issuer_did = keys.get_or_create_key(KeyRole::Issuer).unwrap().did();
    for record in &records {
        let verified = verify(&record.vc).unwrap();
        let cred = verified.as_credential().unwrap();
        assert_eq!(verified.signer, issuer_did);
        assert_eq!(cred.subject.id, record.name);
        assert_eq!(cred.subject.claim, record.claim);
        assert_eq!(cred.end_time.to_rfc3339(), record.end_time);
    }
}
