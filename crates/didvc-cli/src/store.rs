//! # JSON-File Record Store
//!
//! Keeps every credential record in a single JSON array on disk. Writes go
//! to a sibling temporary file that is then renamed over the original.
//!
//! `create` is a read-modify-write, so it runs under an advisory lock file
//! (`<records>.lock`) shared by every process using the same record file.
//! A lock older than [`STALE_LOCK_AFTER`] is assumed abandoned and removed.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use didvc_vc::record::{CredentialRecord, CredentialStore};
use didvc_vc::StoreError;
use parking_lot::Mutex;

/// How long `create` waits for another writer before giving up.
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Age after which a leftover lock file is treated as abandoned.
pub const STALE_LOCK_AFTER: Duration = Duration::from_secs(60);

const LOCK_RETRY: Duration = Duration::from_millis(5);

/// Held while a process owns the record file. Removes the lock on drop.
#[derive(Debug)]
struct FileLock {
    path: PathBuf,
}

impl FileLock {
    fn acquire(path: PathBuf) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let deadline = Instant::now() + LOCK_TIMEOUT;
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    writeln!(file, "{}", std::process::id())?;
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if is_stale(&path) {
                        tracing::warn!(lock = %path.display(), "removing stale record lock");
                        let _ = fs::remove_file(&path);
                        continue;
                    }
                    if Instant::now() >= deadline {
                        return Err(io::Error::new(
                            io::ErrorKind::TimedOut,
                            format!("record file is locked: {}", path.display()),
                        ));
                    }
                    thread::sleep(LOCK_RETRY);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn is_stale(path: &Path) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age > STALE_LOCK_AFTER)
}

/// Credential records stored in one JSON file.
#[derive(Debug)]
pub struct JsonFileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileCredentialStore {
    /// Store backed by `path`. A missing file reads as empty.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the advisory lock file.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn read_all(&self) -> Result<Vec<CredentialRecord>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Backend(Box::new(e))),
        };
        serde_json::from_str(&content).map_err(|e| StoreError::Backend(Box::new(e)))
    }

    fn write_all(&self, records: &[CredentialRecord]) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(records).map_err(|e| StoreError::Backend(Box::new(e)))?;
        let tmp = self.path.with_extension("json.tmp");
        let write = || -> io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&tmp, json.as_bytes())?;
            fs::rename(&tmp, &self.path)
        };
        write().map_err(|e| StoreError::Backend(Box::new(e)))
    }
}

impl CredentialStore for JsonFileCredentialStore {
    fn create(&self, record: CredentialRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let _file_lock =
            FileLock::acquire(self.lock_path()).map_err(|e| StoreError::Backend(Box::new(e)))?;
        let mut records = self.read_all()?;
        if records.iter().any(|r| r.name == record.name) {
            return Err(StoreError::Conflict(record.name));
        }
        tracing::debug!(name = %record.name, path = %self.path.display(), "storing record");
        records.push(record);
        self.write_all(&records)
    }

    fn list(&self) -> Result<Vec<CredentialRecord>, StoreError> {
        let _guard = self.lock.lock();
        self.read_all()
    }
}
