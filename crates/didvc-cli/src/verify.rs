//! # Verify Subcommand
//!
//! Verifies a credential or presentation token using nothing but the token.
//! With `--credentials`, every credential inside a presentation is verified
//! too and the command fails if any of them does.

use anyhow::Result;
use clap::Args;
use didvc_vc::verify::{verify, verify_presentation_credentials};
use didvc_vc::Payload;

use crate::{read_arg_or_stdin, EXIT_INVALID, EXIT_OK};

/// Arguments for `didvc verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// The token to verify. `-` reads it from stdin.
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Also verify each credential embedded in a presentation.
    #[arg(long)]
    pub credentials: bool,
}

/// Execute `didvc verify`.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let token = read_arg_or_stdin(&args.token)?;
    Ok(verify_token(&token, args.credentials))
}

fn verify_token(token: &str, check_credentials: bool) -> u8 {
    let verified = match verify(token) {
        Ok(v) => v,
        Err(e) => {
            println!("FAIL: {}: {e}", e.kind());
            return EXIT_INVALID;
        }
    };

    match &verified.payload {
        Payload::Credential(c) => {
            println!("OK: valid credential {:?} signed by {}", c.subject.id, verified.signer);
            EXIT_OK
        }
        Payload::Presentation(p) => {
            println!(
                "OK: valid presentation of {} credential(s) signed by {}",
                p.credentials.len(),
                verified.signer
            );
            if !check_credentials {
                return EXIT_OK;
            }
            let mut code = EXIT_OK;
            for report in verify_presentation_credentials(p) {
                match &report.outcome {
                    Ok(c) => println!("  [{}] OK: {:?} issued by {}", report.index, c.subject.id, c.issuer),
                    Err(e) => {
                        println!("  [{}] FAIL: {}: {e}", report.index, e.kind());
                        code = EXIT_INVALID;
                    }
                }
            }
            code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use didvc_crypto::P256KeyPair;
    use didvc_vc::credential::{issue, SubjectClaim};
    use didvc_vc::presentation::present;

    fn credential(kp: &P256KeyPair) -> String {
        issue(&SubjectClaim::new("n", "c"), "h", kp, Duration::days(1))
            .unwrap()
            .token
    }

    #[test]
    fn valid_credential() {
        let kp = P256KeyPair::generate();
        assert_eq!(verify_token(&credential(&kp), false), EXIT_OK);
    }

    #[test]
    fn malformed_token() {
        assert_eq!(verify_token("not-a-token", false), EXIT_INVALID);
    }

    #[test]
    fn presentation_with_bad_credential() {
        let issuer = P256KeyPair::generate();
        let holder = P256KeyPair::generate();
        let vp = present(&[credential(&issuer), "x.y.z".to_string()], &holder).unwrap();

        assert_eq!(verify_token(&vp, false), EXIT_OK);
        assert_eq!(verify_token(&vp, true), EXIT_INVALID);
    }

    #[test]
    fn presentation_with_good_credentials() {
        let issuer = P256KeyPair::generate();
        let holder = P256KeyPair::generate();
        let vp = present(&[credential(&issuer), credential(&issuer)], &holder).unwrap();
        assert_eq!(verify_token(&vp, true), EXIT_OK);
    }
}
