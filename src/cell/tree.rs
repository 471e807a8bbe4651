//! Immutable cell nodes and their representation hash.

use crate::cell::bits::BitString;
use crate::cell::slice::Slice;
use crate::types::encoding::{Encode, EncodeSink};
use crate::types::hash::Hash;
use std::fmt;

/// Finalized tree node: up to 1023 data bits and up to four child cells.
///
/// A cell owns its children outright; trees built here never share a subtree
/// between two parents and cannot be cyclic. Cells are only produced by
/// [`Builder::end_cell`](super::Builder::end_cell) and are immutable afterwards.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Cell {
    data: BitString,
    refs: Vec<Cell>,
}

impl Cell {
    pub(crate) fn from_parts(data: BitString, refs: Vec<Cell>) -> Self {
        Self { data, refs }
    }

    pub fn data(&self) -> &BitString {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.data.len()
    }

    pub fn refs(&self) -> &[Cell] {
        &self.refs
    }

    pub fn reference(&self, index: usize) -> Option<&Cell> {
        self.refs.get(index)
    }

    /// True if the cell carries neither data nor references.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.refs.is_empty()
    }

    /// Opens a reader positioned at the first bit and first reference.
    pub fn parse(&self) -> Slice<'_> {
        Slice::new(self)
    }

    /// Longest path to a leaf, counted in references.
    pub fn depth(&self) -> u16 {
        self.refs
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Standard representation hash of an ordinary cell.
    ///
    /// Trees with identical bits and shape hash identically.
    pub fn repr_hash(&self) -> Hash {
        let mut h = Hash::sha256();
        self.encode(&mut h);
        h.finalize()
    }

    /// Descriptor bytes: reference count (ordinary, level 0) and data length.
    fn descriptors(&self) -> [u8; 2] {
        let bits = self.data.len();
        let d1 = self.refs.len() as u8;
        let d2 = (bits / 8 + bits.div_ceil(8)) as u8;
        [d1, d2]
    }

    /// Data bytes with the completion tag appended when not byte-aligned.
    fn padded_data(&self) -> Vec<u8> {
        let mut bytes = self.data.as_bytes().to_vec();
        let rem = self.data.len() % 8;
        if rem != 0
            && let Some(last) = bytes.last_mut()
        {
            *last |= 0x80 >> rem;
        }
        bytes
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:indent$}x{{{}}}", "", fift_hex(&self.data), indent = indent)?;
        for child in &self.refs {
            writeln!(f)?;
            child.fmt_tree(f, indent + 1)?;
        }
        Ok(())
    }
}

impl Encode for Cell {
    /// Writes the representation: descriptors, padded data, child depths, child hashes.
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(&self.descriptors());
        out.write(&self.padded_data());
        for child in &self.refs {
            out.write(&child.depth().to_be_bytes());
        }
        for child in &self.refs {
            out.write(child.repr_hash().as_slice());
        }
    }
}

/// Upper-case hex of `bits`; a trailing `_` marks a completion tag when the
/// length is not a multiple of four.
fn fift_hex(bits: &BitString) -> String {
    let mut padded = bits.clone();
    let tagged = bits.len() % 4 != 0;
    if tagged {
        padded.push(true);
        while padded.len() % 4 != 0 {
            padded.push(false);
        }
    }

    let mut out = String::with_capacity(padded.len() / 4 + 1);
    for (i, byte) in padded.as_bytes().iter().enumerate() {
        out.push_str(&format!("{:02X}", byte));
        if (i + 1) * 8 > padded.len() {
            out.pop();
        }
    }
    if tagged {
        out.push('_');
    }
    out
}

impl fmt::Display for Cell {
    /// Fift-style tree dump, one cell per line, children indented by one space.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({} bits, {} refs) {}", self.bit_len(), self.refs.len(), self)
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::Builder;

    #[test]
    fn empty_cell_hash_matches_reference_value() {
        let cell = Builder::new().end_cell();
        assert_eq!(
            cell.repr_hash().to_string(),
            "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
        );
    }

    #[test]
    fn depth_counts_longest_branch() {
        let leaf = Builder::new().end_cell();
        assert_eq!(leaf.depth(), 0);

        let mut mid = Builder::new();
        mid.store_ref(leaf.clone()).unwrap();
        let mid = mid.end_cell();

        let mut root = Builder::new();
        root.store_ref(leaf).unwrap().store_ref(mid).unwrap();
        assert_eq!(root.end_cell().depth(), 2);
    }

    #[test]
    fn equal_trees_hash_equal() {
        let build = |v: u128| {
            let mut b = Builder::new();
            b.store_uint(v, 32).unwrap();
            b.end_cell()
        };
        assert_eq!(build(7).repr_hash(), build(7).repr_hash());
        assert_ne!(build(7).repr_hash(), build(8).repr_hash());
    }

    #[test]
    fn display_uses_completion_tag() {
        let mut b = Builder::new();
        b.store_uint(0b101, 3).unwrap();
        assert_eq!(b.end_cell().to_string(), "x{B_}");

        let mut b = Builder::new();
        b.store_uint(0xABC, 12).unwrap();
        let inner = b.end_cell();
        let mut root = Builder::new();
        root.store_uint(0x7, 4).unwrap().store_ref(inner).unwrap();
        assert_eq!(root.end_cell().to_string(), "x{7}\n x{ABC}");
    }

    #[test]
    fn display_empty_cell() {
        assert_eq!(Builder::new().end_cell().to_string(), "x{}");
    }
}
