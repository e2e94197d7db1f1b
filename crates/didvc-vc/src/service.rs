//! # Issuer and Holder Services
//!
//! The two request flows of a deployment, written against injected
//! collaborators:
//!
//! - issuer: get-or-create the issuer key, issue, persist the record;
//! - holder: get-or-create the holder key, build a presentation.

use std::sync::Arc;

use chrono::Duration;
use didvc_core::DidKey;
use didvc_crypto::{KeyProvider, KeyRole};

use crate::credential::{self, SubjectClaim, DEFAULT_VALIDITY_DAYS};
use crate::error::{StoreError, VcError};
use crate::presentation;
use crate::record::{CredentialRecord, CredentialStore};

/// Issues credentials and records them.
pub struct CredentialIssuer {
    keys: Arc<dyn KeyProvider>,
    store: Arc<dyn CredentialStore>,
    validity: Duration,
}

impl CredentialIssuer {
    /// Issuer with the default validity window.
    pub fn new(keys: Arc<dyn KeyProvider>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            keys,
            store,
            validity: Duration::days(DEFAULT_VALIDITY_DAYS),
        }
    }

    /// Override the validity window.
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// Identifier of the issuer key, creating the key if needed.
    pub fn did(&self) -> Result<DidKey, VcError> {
        Ok(self.keys.get_or_create_key(KeyRole::Issuer)?.did())
    }

    /// Issue a credential named `name` and store its record.
    ///
    /// # Errors
    ///
    /// `Store(Conflict)` if `name` is taken; no record is written in that
    /// case. `KeyUnavailable` if the issuer key cannot be obtained.
    pub fn issue(&self, name: &str, claim: &str, holder: &str) -> Result<CredentialRecord, VcError> {
        if self.store.get(name)?.is_some() {
            return Err(StoreError::Conflict(name.to_string()).into());
        }
        let key = self.keys.get_or_create_key(KeyRole::Issuer)?;
        let issued = credential::issue(&SubjectClaim::new(name, claim), holder, &key, self.validity)?;
        let record = CredentialRecord::from(&issued);
        self.store.create(record.clone())?;
        Ok(record)
    }

    /// All stored records.
    pub fn list(&self) -> Result<Vec<CredentialRecord>, VcError> {
        Ok(self.store.list()?)
    }
}

/// Builds presentations with the holder key.
pub struct CredentialHolder {
    keys: Arc<dyn KeyProvider>,
}

impl CredentialHolder {
    /// Holder signing with the `Holder` key from `keys`.
    pub fn new(keys: Arc<dyn KeyProvider>) -> Self {
        Self { keys }
    }

    /// Identifier of the holder key, creating the key if needed.
    pub fn did(&self) -> Result<DidKey, VcError> {
        Ok(self.keys.get_or_create_key(KeyRole::Holder)?.did())
    }

    /// Bundle `tokens` into a presentation.
    ///
    /// The empty check runs before the key provider is consulted.
    pub fn present(&self, tokens: &[String]) -> Result<String, VcError> {
        if tokens.is_empty() {
            return Err(VcError::EmptyPresentation);
        }
        let key = self.keys.get_or_create_key(KeyRole::Holder)?;
        presentation::present(tokens, &key)
    }
}
