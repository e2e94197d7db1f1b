//! # Key Providers
//!
//! A [`KeyProvider`] hands out one long-lived key pair per [`KeyRole`],
//! generating it on first use. The contract is "returns a key pair or fails
//! with `KeyUnavailable`"; nothing else in the workspace touches key storage.
//!
//! Both providers serialize get-or-create behind a mutex, so concurrent
//! first requests for a role never see two different keys from the same
//! provider instance. The file provider also publishes new keys with an
//! atomic no-clobber link, so separate instances and processes sharing one
//! directory agree on a single key and never observe a partial file.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::KeyError;
use crate::keypair::P256KeyPair;

/// Which party a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    /// Signs credentials.
    Issuer,
    /// Signs presentations.
    Holder,
}

impl KeyRole {
    /// All roles.
    pub const ALL: [KeyRole; 2] = [KeyRole::Issuer, KeyRole::Holder];

    /// Lowercase role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issuer => "issuer",
            Self::Holder => "holder",
        }
    }

    /// File name used by [`FileKeyProvider`].
    pub fn file_name(&self) -> String {
        format!("{}_private.key", self.as_str())
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issuer" => Ok(Self::Issuer),
            "holder" => Ok(Self::Holder),
            other => Err(format!("unknown key role {other:?}, expected issuer or holder")),
        }
    }
}

/// Source of per-role signing keys.
pub trait KeyProvider: Send + Sync {
    /// Return the key for `role`, creating and storing it on first use.
    fn get_or_create_key(&self, role: KeyRole) -> Result<P256KeyPair, KeyError>;
}

// ---------------------------------------------------------------------------
// In-memory provider
// ---------------------------------------------------------------------------

/// Keys held for the lifetime of the provider. Nothing is persisted.
#[derive(Debug, Default)]
pub struct InMemoryKeyProvider {
    keys: Mutex<HashMap<KeyRole, P256KeyPair>>,
}

impl InMemoryKeyProvider {
    /// Empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider preloaded with `key` for `role`.
    pub fn with_key(self, role: KeyRole, key: P256KeyPair) -> Self {
        self.keys.lock().insert(role, key);
        self
    }
}

impl KeyProvider for InMemoryKeyProvider {
    fn get_or_create_key(&self, role: KeyRole) -> Result<P256KeyPair, KeyError> {
        let mut keys = self.keys.lock();
        let key = keys.entry(role).or_insert_with(|| {
            tracing::debug!(%role, "generated in-memory key");
            P256KeyPair::generate()
        });
        Ok(key.clone())
    }
}

// ---------------------------------------------------------------------------
// File provider
// ---------------------------------------------------------------------------

/// Keys stored as raw big-endian scalars under one directory.
///
/// Layout: `<dir>/issuer_private.key` and `<dir>/holder_private.key`,
/// 32 bytes each, mode `0600` on Unix. Shorter files written by older tools
/// are accepted and left-padded.
#[derive(Debug)]
pub struct FileKeyProvider {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyProvider {
    /// Provider rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the key file for `role`.
    pub fn key_path(&self, role: KeyRole) -> PathBuf {
        self.dir.join(role.file_name())
    }

    fn load(&self, role: KeyRole, path: &Path) -> Result<P256KeyPair, KeyError> {
        let bytes = zeroize::Zeroizing::new(
            fs::read(path).map_err(|source| KeyError::Io { role, source })?,
        );
        P256KeyPair::from_scalar_bytes(&bytes).map_err(|source| KeyError::Corrupt { role, source })
    }

    /// Write a fresh key to a private temp file in the key directory, then
    /// link it into place only if no key exists yet. `Ok(None)` means another
    /// writer published first and its key should be loaded instead.
    fn create(&self, role: KeyRole, path: &Path) -> io::Result<Option<P256KeyPair>> {
        fs::create_dir_all(&self.dir)?;

        // tempfile opens with mode 0600 on Unix.
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", role.file_name()))
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;

        let key = P256KeyPair::generate();
        tmp.write_all(&key.scalar_bytes()[..])?;
        tmp.as_file().sync_all()?;

        match tmp.persist_noclobber(path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => return Ok(None),
            Err(e) => return Err(e.error),
        }
        tracing::info!(%role, path = %path.display(), did = %key.did(), "created key");
        Ok(Some(key))
    }
}

impl KeyProvider for FileKeyProvider {
    fn get_or_create_key(&self, role: KeyRole) -> Result<P256KeyPair, KeyError> {
        let _guard = self.lock.lock();
        let path = self.key_path(role);

        if path.exists() {
            let result = self.load(role, &path);
            if let Err(e) = &result {
                tracing::error!(%role, path = %path.display(), error = %e, "key unavailable");
            }
            return result;
        }

        let result = match self.create(role, &path) {
            Ok(Some(key)) => Ok(key),
            Ok(None) => self.load(role, &path),
            Err(source) => Err(KeyError::Io { role, source }),
        };
        if let Err(e) = &result {
            tracing::error!(%role, path = %path.display(), error = %e, "key unavailable");
        }
        result
    }
}
