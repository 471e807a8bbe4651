//! 32-byte hash type shared by account ids, dictionary keys and cell hashes.

use crate::types::encoding::EncodeSink;
use sha2::{Digest, Sha256};
use std::fmt;

/// Hash length in bytes.
pub const HASH_LEN: usize = 32;

/// Hash length in bits, the width of account ids and NFT dictionary keys.
pub const HASH_BITS: usize = HASH_LEN * 8;

/// Fixed-size 32-byte value.
///
/// Serves as the 256-bit account id inside an [`Address`](crate::types::address::Address),
/// as the key of the raffle NFT dictionaries, and as the representation hash of a
/// [`Cell`](crate::cell::Cell). Ordering is lexicographic over the bytes, which
/// matches the big-endian bit order used on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash, Ord, PartialOrd)]
pub struct Hash(pub [u8; HASH_LEN]);

impl Hash {
    /// Creates a zero-valued hash (all bytes are 0x00).
    pub const fn zero() -> Hash {
        Hash([0u8; HASH_LEN])
    }

    /// Returns the hash as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Builds a hash from a slice, returning `None` unless it is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Hash> {
        let arr: [u8; HASH_LEN] = bytes.try_into().ok()?;
        Some(Hash(arr))
    }

    /// Parses 64 hex characters (either case).
    pub fn from_hex(s: &str) -> Option<Hash> {
        let s = s.as_bytes();
        if s.len() != HASH_LEN * 2 {
            return None;
        }
        let mut out = [0u8; HASH_LEN];
        for (i, pair) in s.chunks_exact(2).enumerate() {
            out[i] = (hex_nibble(pair[0])? << 4) | hex_nibble(pair[1])?;
        }
        Some(Hash(out))
    }

    /// Returns bit `index` counting from the most significant bit of byte 0.
    pub fn bit(&self, index: usize) -> bool {
        (self.0[index / 8] >> (7 - index % 8)) & 1 == 1
    }

    /// Creates a new SHA-256 builder for incremental hashing.
    pub fn sha256() -> HashBuilder {
        HashBuilder::new()
    }
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl From<[u8; HASH_LEN]> for Hash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Hash(bytes)
    }
}

/// Incremental SHA-256 hash builder.
///
/// Implements [`EncodeSink`] so a cell representation can be streamed
/// straight into the digest.
pub struct HashBuilder {
    hasher: Sha256,
}

impl HashBuilder {
    /// Creates a new hash builder with empty state.
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Consumes the builder and returns the final hash.
    pub fn finalize(self) -> Hash {
        Hash(self.hasher.finalize().into())
    }
}

impl Default for HashBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeSink for HashBuilder {
    fn write(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let mut bytes = [0u8; HASH_LEN];
        bytes[0] = 0xAB;
        bytes[31] = 0x01;
        let hash = Hash(bytes);
        let text = hash.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.starts_with("ab00"));
        assert_eq!(Hash::from_hex(&text), Some(hash));
        assert_eq!(Hash::from_hex(&text.to_uppercase()), Some(hash));
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert_eq!(Hash::from_hex("abcd"), None);
        assert_eq!(Hash::from_hex(&"zz".repeat(32)), None);
    }

    #[test]
    fn bit_is_msb_first() {
        let mut bytes = [0u8; HASH_LEN];
        bytes[0] = 0b1000_0001;
        let hash = Hash(bytes);
        assert!(hash.bit(0));
        assert!(!hash.bit(1));
        assert!(hash.bit(7));
        assert!(!hash.bit(8));
    }

    #[test]
    fn sha256_of_empty_input() {
        let hash = Hash::sha256().finalize();
        assert_eq!(
            hash.to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn from_slice_requires_exact_length() {
        assert!(Hash::from_slice(&[0u8; 31]).is_none());
        assert_eq!(Hash::from_slice(&[7u8; 32]), Some(Hash([7u8; 32])));
    }
}
