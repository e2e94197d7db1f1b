//! # Credential Records
//!
//! The persisted form of an issued credential, keyed by a caller-chosen
//! unique name. Field names match the JSON written by earlier deployments so
//! existing record files keep loading.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::credential::IssuedCredential;
use crate::error::StoreError;

/// A stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Unique record name. Also the subject `id`.
    #[serde(rename = "Credential_Name")]
    pub name: String,
    /// Claim text.
    #[serde(rename = "Claim")]
    pub claim: String,
    /// Holder named at issuance.
    #[serde(rename = "Holder")]
    pub holder: String,
    /// Issuer `did:key`.
    #[serde(rename = "Issuer")]
    pub issuer: String,
    /// RFC 3339 start of the validity window.
    #[serde(rename = "Start_Time")]
    pub start_time: String,
    /// RFC 3339 end of the validity window.
    #[serde(rename = "End_Time")]
    pub end_time: String,
    /// The credential token.
    #[serde(rename = "VC")]
    pub vc: String,
}

impl From<&IssuedCredential> for CredentialRecord {
    fn from(issued: &IssuedCredential) -> Self {
        let c = &issued.credential;
        Self {
            name: c.subject.id.clone(),
            claim: c.subject.claim.clone(),
            holder: c.subject.holder.clone(),
            issuer: issued.issuer.to_string(),
            start_time: c.start_time.to_rfc3339(),
            end_time: c.end_time.to_rfc3339(),
            vc: issued.token.clone(),
        }
    }
}

/// Storage for credential records.
pub trait CredentialStore: Send + Sync {
    /// Insert a record.
    ///
    /// # Errors
    ///
    /// `Conflict` if a record with the same name exists.
    fn create(&self, record: CredentialRecord) -> Result<(), StoreError>;

    /// All records in insertion order.
    fn list(&self) -> Result<Vec<CredentialRecord>, StoreError>;

    /// Look up a record by name.
    fn get(&self, name: &str) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self.list()?.into_iter().find(|r| r.name == name))
    }
}

/// Records held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<Vec<CredentialRecord>>,
}

impl InMemoryCredentialStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn create(&self, record: CredentialRecord) -> Result<(), StoreError> {
        let mut records = self.records.write();
        if records.iter().any(|r| r.name == record.name) {
            return Err(StoreError::Conflict(record.name));
        }
        records.push(record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<CredentialRecord>, StoreError> {
        Ok(self.records.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> CredentialRecord {
        CredentialRecord {
            name: name.to_string(),
            claim: "claim".to_string(),
            holder: "holder".to_string(),
            issuer: "did:key:zDn".to_string(),
            start_time: "2026-01-01T00:00:00Z".to_string(),
            end_time: "2027-01-01T00:00:00Z".to_string(),
            vc: "a.b.c".to_string(),
        }
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = InMemoryCredentialStore::new();
        for name in ["b", "a", "c"] {
            store.create(record(name)).unwrap();
        }
        let names: Vec<String> = store.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn duplicate_name_is_conflict() {
        let store = InMemoryCredentialStore::new();
        store.create(record("dup")).unwrap();
        let err = store.create(record("dup")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref n) if n == "dup"));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn get_by_name() {
        let store = InMemoryCredentialStore::new();
        store.create(record("x")).unwrap();
        assert_eq!(store.get("x").unwrap(), Some(record("x")));
        assert_eq!(store.get("y").unwrap(), None);
    }

    #[test]
    fn json_field_names() {
        let value = serde_json::to_value(record("n")).unwrap();
        for key in [
            "Credential_Name",
            "Claim",
            "Holder",
            "Issuer",
            "Start_Time",
            "End_Time",
            "VC",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
