//! # DID Subcommand
//!
//! Show the identifier of a role key, or resolve an identifier to its
//! public key.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use didvc_crypto::{public_key_from_did, KeyProvider, KeyRole};

use crate::config::Settings;
use crate::{EXIT_INVALID, EXIT_OK};

/// Arguments for `didvc did`.
#[derive(Args, Debug)]
pub struct DidArgs {
    #[command(subcommand)]
    pub command: DidCommand,
}

/// DID subcommands.
#[derive(Subcommand, Debug)]
pub enum DidCommand {
    /// Print the did:key of a role key, creating the key if needed.
    Show {
        /// `issuer` or `holder`.
        #[arg(long, default_value = "issuer")]
        role: KeyRole,
    },

    /// Resolve a did:key to its compressed P-256 public key.
    Resolve {
        /// The identifier to resolve.
        #[arg(value_name = "DID")]
        did: String,
    },
}

/// Execute the did subcommand.
pub fn run_did(args: &DidArgs, settings: &Settings) -> Result<u8> {
    match &args.command {
        DidCommand::Show { role } => cmd_show(settings, *role),
        DidCommand::Resolve { did } => Ok(cmd_resolve(did)),
    }
}

fn cmd_show(settings: &Settings, role: KeyRole) -> Result<u8> {
    let key = settings
        .key_provider()
        .get_or_create_key(role)
        .with_context(|| format!("failed to load {role} key"))?;
    println!("{}", key.did());
    Ok(EXIT_OK)
}

fn cmd_resolve(did: &str) -> u8 {
    match public_key_from_did(did) {
        Ok(pk) => {
            let hex: String = pk.to_compressed().iter().map(|b| format!("{b:02x}")).collect();
            println!("OK: P-256 public key {hex}");
            EXIT_OK
        }
        Err(e) => {
            println!("FAIL: {}: {e}", e.kind());
            EXIT_INVALID
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn settings(home: PathBuf) -> Settings {
        Settings {
            records_path: home.join("credentials.json"),
            home,
            validity_days: 365,
        }
    }

    #[test]
    fn show_creates_role_key() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path().to_path_buf());
        assert_eq!(cmd_show(&s, KeyRole::Holder).unwrap(), EXIT_OK);
        assert!(dir.path().join("holder_private.key").exists());
        assert!(!dir.path().join("issuer_private.key").exists());
    }

    #[test]
    fn resolve_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path().to_path_buf());
        let did = s.key_provider().get_or_create_key(KeyRole::Issuer).unwrap().did();
        assert_eq!(cmd_resolve(did.as_str()), EXIT_OK);
        assert_eq!(cmd_resolve("did:web:example.com"), EXIT_INVALID);
    }
}
