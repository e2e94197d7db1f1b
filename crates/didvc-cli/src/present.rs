//! # Present Subcommand
//!
//! Bundles credential tokens into a presentation signed by the holder key.
//! Tokens can be given directly or picked from the record file by name.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use didvc_vc::record::CredentialStore;
use didvc_vc::{CredentialHolder, VcError};

use crate::config::Settings;
use crate::store::JsonFileCredentialStore;
use crate::{read_arg_or_stdin, EXIT_INVALID, EXIT_OK};

/// Arguments for `didvc present`.
#[derive(Args, Debug)]
pub struct PresentArgs {
    /// Credential tokens to include, in order. A single `-` reads one from
    /// stdin.
    #[arg(value_name = "TOKEN")]
    pub tokens: Vec<String>,

    /// Include the stored credential with this name. Repeatable; appended
    /// after any positional tokens.
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,
}

/// Execute `didvc present`.
pub fn run_present(args: &PresentArgs, settings: &Settings) -> Result<u8> {
    if args.tokens.iter().filter(|t| *t == "-").count() > 1 {
        bail!("`-` may be given at most once; stdin holds a single token");
    }
    let mut tokens = args
        .tokens
        .iter()
        .map(|t| read_arg_or_stdin(t))
        .collect::<Result<Vec<_>>>()?;

    if !args.names.is_empty() {
        let store = JsonFileCredentialStore::new(&settings.records_path);
        for name in &args.names {
            let Some(record) = store
                .get(name)
                .with_context(|| format!("failed to read record {name:?}"))?
            else {
                bail!("no stored credential named {name:?}");
            };
            tokens.push(record.vc);
        }
    }

    let holder = CredentialHolder::new(Arc::new(settings.key_provider()));
    match holder.present(&tokens) {
        Ok(vp) => {
            println!("{vp}");
            Ok(EXIT_OK)
        }
        Err(VcError::EmptyPresentation) => {
            println!("FAIL: {}", VcError::EmptyPresentation);
            Ok(EXIT_INVALID)
        }
        Err(e) => Err(e).context("failed to build presentation"),
    }
}
