//! Growable bit string, most significant bit first.

use std::fmt;

/// Ordered sequence of bits packed MSB-first into bytes.
///
/// Bits past `len` in the last byte are always zero, so two bit strings are
/// equal exactly when their bit sequences are equal.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bytes: Vec<u8>,
    len: usize,
}

impl BitString {
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            len: 0,
        }
    }

    /// Takes the first `len` bits of `bytes`.
    ///
    /// Returns `None` if `bytes` holds fewer than `len` bits.
    pub fn from_bytes(bytes: &[u8], len: usize) -> Option<Self> {
        if len > bytes.len() * 8 {
            return None;
        }
        let mut out = bytes[..len.div_ceil(8)].to_vec();
        if len % 8 != 0
            && let Some(last) = out.last_mut()
        {
            *last &= 0xFFu8 << (8 - len % 8);
        }
        Some(Self { bytes: out, len })
    }

    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        let mut out = Self::new();
        for bit in bits {
            out.push(bit);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed bytes; the final byte is zero-padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn push(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let idx = self.len / 8;
            self.bytes[idx] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
    }

    /// Appends the low `bits` bits of `value`, most significant first.
    ///
    /// Bits of `value` above `bits` are ignored; range checking is the
    /// caller's job.
    pub fn push_uint(&mut self, value: u128, bits: usize) {
        for i in (0..bits).rev() {
            self.push(i < 128 && (value >> i) & 1 == 1);
        }
    }

    pub fn append(&mut self, other: &BitString) {
        if self.len % 8 == 0 {
            self.bytes.extend_from_slice(&other.bytes);
            self.len += other.len;
            return;
        }
        for bit in other.iter() {
            self.push(bit);
        }
    }

    /// Returns bit `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some((self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    /// Copies `len` bits starting at `start`.
    pub fn range(&self, start: usize, len: usize) -> Option<BitString> {
        if start.checked_add(len)? > self.len {
            return None;
        }
        Some(BitString::from_bits((start..start + len).map(|i| self.bit(i))))
    }

    /// Number of leading bits shared with `other`.
    pub fn common_prefix_len(&self, other: &BitString) -> usize {
        self.iter()
            .zip(other.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Returns `Some(bit)` if every bit equals `bit`; `None` if mixed or empty.
    pub fn uniform_bit(&self) -> Option<bool> {
        let first = self.get(0)?;
        self.iter().all(|b| b == first).then_some(first)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.bit(i))
    }

    fn bit(&self, index: usize) -> bool {
        (self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString(")?;
        for bit in self.iter() {
            write!(f, "{}", bit as u8)?;
        }
        write!(f, ")")
    }
}
