//! Content hashing for artifact reconciliation.

use sha2::{Digest, Sha256};

/// Encode bytes as lowercase hex.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}

/// SHA-256 hex digest of `content`.
#[must_use]
pub fn sha256_hex(content: &[u8]) -> String {
    hex_encode(&Sha256::digest(content))
}
