//! # didvc-cli — Command-Line Front End
//!
//! Wires the file-backed key provider and the JSON record store to the
//! credential protocols.
//!
//! ## Subcommands
//!
//! - `didvc did` — show the issuer/holder identifier, resolve an identifier.
//! - `didvc issue` — issue a credential and record it.
//! - `didvc list` — print stored credential records.
//! - `didvc present` — bundle credential tokens into a presentation.
//! - `didvc verify` — verify a credential or presentation token.
//!
//! ```bash
//! didvc issue --name employee-42 --claim "works at ACME" --holder bob
//! didvc present --name employee-42
//! didvc verify --credentials <TOKEN>
//! ```
//!
//! ## Exit Codes
//!
//! `0` success or valid token, `1` invalid token or rejected request,
//! `2` usage, configuration or I/O failure.

pub mod config;
pub mod did;
pub mod issue;
pub mod present;
pub mod store;
pub mod verify;

use std::io::Read;

use anyhow::{Context, Result};

/// Exit code for success.
pub const EXIT_OK: u8 = 0;

/// Exit code for an invalid token or a rejected request.
pub const EXIT_INVALID: u8 = 1;

/// Exit code for usage, configuration and I/O failures.
pub const EXIT_ERROR: u8 = 2;

/// Return `arg`, or read it from stdin when it is `-`.
pub fn read_arg_or_stdin(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read from stdin")?;
    Ok(buf.trim().to_string())
}
