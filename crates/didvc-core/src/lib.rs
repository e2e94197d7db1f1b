//! # didvc-core — Foundational Types
//!
//! Leaf crate of the didvc workspace. Defines the byte- and text-level
//! primitives that every other crate builds on:
//!
//! - **Multicodec tags** (`multicodec.rs`): unsigned LEB128 varint prefixes
//!   identifying the key type of the bytes that follow.
//! - **did:key identifiers** (`identity.rs`): the textual half of the
//!   self-certifying identifier codec. Parses and formats
//!   `did:key:z<base58btc(tag ‖ key)>` without touching curve arithmetic.
//! - **Canonical bytes** (`canonical.rs`): the only serialization path for
//!   signed token segments.
//! - **Timestamps** (`temporal.rs`): UTC, seconds precision, `Z` suffix.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `didvc-*` crates.
//! - No elliptic-curve code. Point decompression lives in `didvc-crypto`.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod multicodec;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use error::{CanonicalizationError, CoreError, IdentifierError, TagError};
pub use identity::DidKey;
pub use multicodec::P256_PUB;
pub use temporal::Timestamp;
