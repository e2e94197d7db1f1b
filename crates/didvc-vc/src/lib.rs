//! # didvc-vc — Credential Protocols
//!
//! Builds the credential layer on top of the compact signed token engine:
//!
//! - **Credential** (`credential.rs`): claim payload structure and issuance.
//! - **Presentation** (`presentation.rs`): holder-signed bundles of
//!   credential tokens.
//! - **Verification** (`verify.rs`): token verification followed by payload
//!   classification and structural checks, plus per-credential verification
//!   of a presentation's contents.
//! - **Records** (`record.rs`): the persisted form of an issued credential
//!   and the `CredentialStore` trait.
//! - **Services** (`service.rs`): issuer and holder flows over injected key
//!   providers and record stores.
//!
//! ## Security Invariant
//!
//! Every token is produced and checked by `didvc_crypto::token`. Nothing in
//! this crate touches signature bytes directly.
//!
//! ## Crate Policy
//!
//! - Depends on `didvc-core` and `didvc-crypto` internally.
//! - Issuance, presentation and verification are pure functions. Only the
//!   services reach key providers and stores, and only through traits.
//! - Wire field names (`Start_Time`, `End_Time`, `credentialSubject`,
//!   `verifiableCredential`) are fixed and must not be renamed.

#![deny(missing_docs)]

pub mod credential;
pub mod error;
pub mod presentation;
pub mod record;
pub mod service;
pub mod verify;

pub use credential::{CredentialSubject, IssuedCredential, SubjectClaim, VerifiableCredential};
pub use error::{StoreError, VcError};
pub use presentation::VerifiablePresentation;
pub use record::{CredentialRecord, CredentialStore, InMemoryCredentialStore};
pub use service::{CredentialHolder, CredentialIssuer};
pub use verify::{CredentialReport, Payload, VerifiedPayload};
