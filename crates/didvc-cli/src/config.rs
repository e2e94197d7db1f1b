//! # Configuration
//!
//! Settings come from three layers, highest priority first: command-line
//! flags, an optional YAML file given with `--config`, built-in defaults.
//!
//! ```yaml
//! home: /var/lib/didvc
//! validity_days: 30
//! records_file: credentials.json
//! ```
//!
//! A relative `records_file` is resolved against `home`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Duration;
use didvc_crypto::FileKeyProvider;
use didvc_vc::credential::DEFAULT_VALIDITY_DAYS;
use serde::Deserialize;

/// Default directory for keys and records.
pub const DEFAULT_HOME: &str = ".didvc";

/// Default record file name.
pub const DEFAULT_RECORDS_FILE: &str = "credentials.json";

/// Contents of a `--config` file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Directory for keys and records.
    pub home: Option<PathBuf>,
    /// Credential validity window in days.
    pub validity_days: Option<i64>,
    /// Record file, relative to `home` unless absolute.
    pub records_file: Option<PathBuf>,
}

impl ConfigFile {
    /// Load and parse a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding key files and, by default, the record file.
    pub home: PathBuf,
    /// Credential validity window in days.
    pub validity_days: i64,
    /// Path of the JSON record file.
    pub records_path: PathBuf,
}

impl Settings {
    /// Merge flag values over an optional config file over defaults.
    pub fn resolve(home_flag: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let home = home_flag
            .map(Path::to_path_buf)
            .or(file.home)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME));

        let validity_days = file.validity_days.unwrap_or(DEFAULT_VALIDITY_DAYS);
        validity_from_days(validity_days)?;

        let records_file = file
            .records_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_FILE));
        let records_path = if records_file.is_absolute() {
            records_file
        } else {
            home.join(records_file)
        };

        tracing::debug!(
            home = %home.display(),
            validity_days,
            records = %records_path.display(),
            "resolved settings"
        );
        Ok(Self {
            home,
            validity_days,
            records_path,
        })
    }

    /// Validity window as a duration.
    pub fn validity(&self) -> Result<Duration> {
        validity_from_days(self.validity_days)
    }

    /// Key provider rooted at `home`.
    pub fn key_provider(&self) -> FileKeyProvider {
        FileKeyProvider::new(&self.home)
    }
}

fn validity_from_days(days: i64) -> Result<Duration> {
    if days < 0 {
        bail!("validity_days must not be negative, got {days}");
    }
    match Duration::try_days(days) {
        Some(validity) => Ok(validity),
        None => bail!("validity_days is too large, got {days}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::resolve(None, None).unwrap();
        assert_eq!(s.home, PathBuf::from(".didvc"));
        assert_eq!(s.validity_days, 365);
        assert_eq!(s.records_path, PathBuf::from(".didvc/credentials.json"));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("didvc.yaml");
        std::fs::write(&cfg, "home: /srv/didvc\nvalidity_days: 30\nrecords_file: vc.json\n").unwrap();

        let s = Settings::resolve(None, Some(&cfg)).unwrap();
        assert_eq!(s.home, PathBuf::from("/srv/didvc"));
        assert_eq!(s.validity_days, 30);
        assert_eq!(s.records_path, PathBuf::from("/srv/didvc/vc.json"));
        assert_eq!(s.validity().unwrap(), Duration::days(30));
    }

    #[test]
    fn flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("didvc.yaml");
        std::fs::write(&cfg, "home: /srv/didvc\n").unwrap();

        let s = Settings::resolve(Some(Path::new("/tmp/other")), Some(&cfg)).unwrap();
        assert_eq!(s.home, PathBuf::from("/tmp/other"));
        assert_eq!(s.records_path, PathBuf::from("/tmp/other/credentials.json"));
    }

    #[test]
    fn absolute_records_file_kept() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("didvc.yaml");
        std::fs::write(&cfg, "records_file: /data/records.json\n").unwrap();
        let s = Settings::resolve(None, Some(&cfg)).unwrap();
        assert_eq!(s.records_path, PathBuf::from("/data/records.json"));
    }

    #[test]
    fn unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("didvc.yaml");
        std::fs::write(&cfg, "homedir: /x\n").unwrap();
        assert!(Settings::resolve(None, Some(&cfg)).is_err());
    }

    #[test]
    fn negative_validity_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("didvc.yaml");
        std::fs::write(&cfg, "validity_days: -1\n").unwrap();
        assert!(Settings::resolve(None, Some(&cfg)).is_err());
    }

    #[test]
    fn out_of_range_validity_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("didvc.yaml");
        std::fs::write(&cfg, "validity_days: 9223372036854775807\n").unwrap();
        let err = Settings::resolve(None, Some(&cfg)).unwrap_err();
        assert!(err.to_string().contains("too large"), "{err}");
    }

    #[test]
    fn validity_of_unchecked_settings_is_error_not_panic() {
        let s = Settings {
            home: PathBuf::from("h"),
            validity_days: i64::MAX,
            records_path: PathBuf::from("h/r.json"),
        };
        assert!(s.validity().is_err());
    }

    #[test]
    fn missing_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::resolve(None, Some(&dir.path().join("nope.yaml"))).is_err());
    }
}
