//! # didvc-crypto — Cryptographic Layer
//!
//! - **P-256 key pairs** (`keypair.rs`): generation, raw-scalar
//!   reconstruction with range validation, SEC1 point compression.
//! - **Signatures** (`signature.rs`): ECDSA P-256 over a SHA-256 digest,
//!   encoded as fixed-width `r ‖ s`.
//! - **did:key resolution** (`did.rs`): the curve half of the
//!   self-certifying identifier codec.
//! - **Compact signed tokens** (`token.rs`): `header.payload.signature`,
//!   payload-agnostic.
//! - **Key providers** (`keystore.rs`): per-role get-or-create key sources.
//!
//! ## Crate Policy
//!
//! - Depends only on `didvc-core` internally.
//! - Token signing and verification hold no state.
//! - Private scalars are never serialized, logged or shown by `Debug`.
//! - No mocking of cryptographic operations in tests.

pub mod did;
pub mod error;
pub mod keypair;
pub mod keystore;
pub mod signature;
pub mod token;

pub use did::{did_from_public_key, public_key_from_did};
pub use error::{CryptoError, KeyError, Segment, TokenError};
pub use keypair::{P256KeyPair, P256PublicKey};
pub use keystore::{FileKeyProvider, InMemoryKeyProvider, KeyProvider, KeyRole};
pub use signature::P256Signature;
pub use token::{TokenHeader, VerifiedToken};
