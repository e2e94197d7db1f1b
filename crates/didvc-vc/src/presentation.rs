//! # Presentation Aggregation
//!
//! A presentation is a holder-signed token bundling credential tokens
//! verbatim, in the order given. Embedded tokens are not checked when the
//! presentation is built; see `verify::verify_presentation_credentials`.

use didvc_core::DidKey;
use didvc_crypto::token::{self, TokenHeader};
use didvc_crypto::P256KeyPair;
use serde::{Deserialize, Serialize};

use crate::credential::CREDENTIALS_CONTEXT;
use crate::error::VcError;

/// `type` marker of a presentation payload.
pub const PRESENTATION_TYPE: &str = "VerifiablePresentation";

/// Presentation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiablePresentation {
    /// JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Type markers. Contains [`PRESENTATION_TYPE`].
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Holder identifier. Must equal the token's `kid`.
    pub holder: String,

    /// Credential tokens, verbatim.
    #[serde(rename = "verifiableCredential")]
    pub credentials: Vec<String>,
}

impl VerifiablePresentation {
    /// Presentation by `holder` carrying `credentials` in order.
    pub fn new(holder: &DidKey, credentials: Vec<String>) -> Self {
        Self {
            context: vec![CREDENTIALS_CONTEXT.to_string()],
            types: vec![PRESENTATION_TYPE.to_string()],
            holder: holder.to_string(),
            credentials,
        }
    }
}

/// Bundle `tokens` into a presentation signed by `holder_key`.
///
/// # Errors
///
/// `EmptyPresentation` if `tokens` is empty.
pub fn present(tokens: &[String], holder_key: &P256KeyPair) -> Result<String, VcError> {
    if tokens.is_empty() {
        return Err(VcError::EmptyPresentation);
    }
    let holder = holder_key.did();
    let presentation = VerifiablePresentation::new(&holder, tokens.to_vec());
    let header = TokenHeader {
        kid: holder.to_string(),
    };
    let vp = token::sign(&header, &presentation, holder_key)?;

    tracing::info!(holder = %holder, credentials = tokens.len(), "built presentation");
    Ok(vp)
}
