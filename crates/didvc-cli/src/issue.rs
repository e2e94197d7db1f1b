//! # Issue and List Subcommands
//!
//! `didvc issue` signs a credential with the issuer key and appends its
//! record to the record file. `didvc list` prints the record file.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use didvc_vc::{CredentialIssuer, StoreError, VcError};

use crate::config::Settings;
use crate::store::JsonFileCredentialStore;
use crate::{EXIT_INVALID, EXIT_OK};

/// Arguments for `didvc issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Unique credential name. Also the subject id.
    #[arg(long)]
    pub name: String,

    /// Claim text.
    #[arg(long)]
    pub claim: String,

    /// Holder the credential is issued to.
    #[arg(long)]
    pub holder: String,
}

/// Arguments for `didvc list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print only the credential tokens, one per line.
    #[arg(long)]
    pub tokens_only: bool,
}

fn issuer(settings: &Settings) -> Result<CredentialIssuer> {
    Ok(CredentialIssuer::new(
        Arc::new(settings.key_provider()),
        Arc::new(JsonFileCredentialStore::new(&settings.records_path)),
    )
    .with_validity(settings.validity()?))
}

/// Execute `didvc issue`.
pub fn run_issue(args: &IssueArgs, settings: &Settings) -> Result<u8> {
    match issuer(settings)?.issue(&args.name, &args.claim, &args.holder) {
        Ok(record) => {
            let json = serde_json::to_string_pretty(&record).context("failed to print record")?;
            println!("{json}");
            Ok(EXIT_OK)
        }
        Err(VcError::Store(e @ StoreError::Conflict(_))) => {
            println!("FAIL: {e}");
            Ok(EXIT_INVALID)
        }
        Err(e) => Err(e).context("failed to issue credential"),
    }
}

/// Execute `didvc list`.
pub fn run_list(args: &ListArgs, settings: &Settings) -> Result<u8> {
    let records = issuer(settings)?
        .list()
        .context("failed to read credential records")?;
    if args.tokens_only {
        for record in &records {
            println!("{}", record.vc);
        }
    } else {
        let json = serde_json::to_string_pretty(&records).context("failed to print records")?;
        println!("{json}");
    }
    Ok(EXIT_OK)
}
