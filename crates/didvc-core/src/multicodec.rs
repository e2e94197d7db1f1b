//! # Multicodec Varint Tags
//!
//! A multicodec value is an unsigned LEB128 integer written in front of raw
//! bytes to say what those bytes are. didvc recognizes exactly one value,
//! [`P256_PUB`], but the codec itself accepts any `u64`.
//!
//! Decoding performs no validation of the remainder. Length and content
//! checks belong to the caller.

use crate::error::TagError;

/// Multicodec code for a SEC1-compressed P-256 public key.
pub const P256_PUB: u64 = 0x1200;

/// Longest valid LEB128 encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Prefix `payload` with the varint encoding of `tag`.
pub fn encode(tag: u64, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN + payload.len());
    let mut value = tag;
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
    out.extend_from_slice(payload);
    out
}

/// Split a varint tag off the front of `data`.
///
/// Returns the tag and the untouched remainder.
///
/// # Errors
///
/// [`TagError::Truncated`] if `data` ends while the continuation bit is still
/// set (this includes empty input), [`TagError::Overflow`] if the value needs
/// more than 64 bits.
pub fn decode(data: &[u8]) -> Result<(u64, &[u8]), TagError> {
    let mut value: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        // The tenth byte may only carry the single remaining bit.
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(TagError::Overflow);
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, &data[i + 1..]));
        }
    }
    Err(TagError::Truncated(data.len()))
}
