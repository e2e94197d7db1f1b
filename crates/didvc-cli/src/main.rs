//! # didvc CLI entry point
//!
//! Parses command-line arguments, resolves settings and dispatches to the
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use didvc_cli::config::Settings;
use didvc_cli::did::{run_did, DidArgs};
use didvc_cli::issue::{run_issue, run_list, IssueArgs, ListArgs};
use didvc_cli::present::{run_present, PresentArgs};
use didvc_cli::verify::{run_verify, VerifyArgs};
use didvc_cli::EXIT_ERROR;

/// didvc: did:key identifiers and signed credentials
///
/// Issues credentials signed with a P-256 issuer key, bundles them into
/// holder-signed presentations, and verifies either kind from the token
/// alone.
#[derive(Parser, Debug)]
#[command(name = "didvc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding keys and credential records [default: .didvc].
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show or resolve did:key identifiers.
    Did(DidArgs),

    /// Issue a credential and record it.
    Issue(IssueArgs),

    /// List recorded credentials.
    List(ListArgs),

    /// Bundle credential tokens into a presentation.
    Present(PresentArgs),

    /// Verify a credential or presentation token.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("didvc CLI starting");

    let settings = match Settings::resolve(cli.home.as_deref(), cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let result = match cli.command {
        Commands::Did(args) => run_did(&args, &settings),
        Commands::Issue(args) => run_issue(&args, &settings),
        Commands::List(args) => run_list(&args, &settings),
        Commands::Present(args) => run_present(&args, &settings),
        Commands::Verify(args) => run_verify(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
