//! Dictionary codec: fixed-width keys to boolean flags, stored as a binary trie
//! of cells.
//!
//! Each trie edge is one cell: a compressed label followed either by the leaf
//! value (when the label exhausts the key) or by two references, one per
//! branch bit. Labels use the shortest of three forms, with `n` the number of
//! key bits still unread at that edge and `k = ceil(log2(n + 1))`:
//!
//! | form  | layout                          | size        |
//! |-------|---------------------------------|-------------|
//! | short | `0`, unary length, label bits   | `2 + 2*len` |
//! | long  | `10`, length in `k` bits, bits  | `2 + k + len` |
//! | same  | `11`, repeated bit, length in `k` bits | `3 + k` |
//!
//! Ties go to short, then long. Because the trie shape depends only on the key
//! bits, a given key set always encodes to the same tree.

use crate::cell::{BitString, Builder, Cell, Slice};
use crate::debug;
use crate::error::CodecError;
use crate::types::hash::{HASH_BITS, Hash};
use std::collections::BTreeMap;

/// Fixed-width dictionary key.
pub trait DictKey: Sized + Ord + Copy {
    /// Key width in bits.
    const BITS: usize;

    /// Key bits, most significant first; exactly `BITS` long.
    fn to_bits(&self) -> BitString;

    /// Inverse of `to_bits`; `None` if `bits` is not `BITS` long.
    fn from_bits(bits: &BitString) -> Option<Self>;
}

impl DictKey for Hash {
    const BITS: usize = HASH_BITS;

    fn to_bits(&self) -> BitString {
        BitString::from_bits((0..HASH_BITS).map(|i| self.bit(i)))
    }

    fn from_bits(bits: &BitString) -> Option<Self> {
        if bits.len() != HASH_BITS {
            return None;
        }
        Hash::from_slice(bits.as_bytes())
    }
}

macro_rules! impl_uint_key {
    ($($t:ty),*) => {
        $(
            impl DictKey for $t {
                const BITS: usize = <$t>::BITS as usize;

                fn to_bits(&self) -> BitString {
                    let mut bits = BitString::new();
                    bits.push_uint(*self as u128, <Self as DictKey>::BITS);
                    bits
                }

                fn from_bits(bits: &BitString) -> Option<Self> {
                    if bits.len() != <Self as DictKey>::BITS {
                        return None;
                    }
                    Some(bits.iter().fold(0 as $t, |acc, b| (acc << 1) | b as $t))
                }
            }
        )*
    };
}

impl_uint_key!(u8, u16, u32, u64);

/// In-memory trie before serialization.
#[derive(Debug)]
enum Node {
    Leaf(bool),
    Fork(Box<Edge>, Box<Edge>),
}

#[derive(Debug)]
struct Edge {
    label: BitString,
    node: Node,
}

impl Edge {
    /// Builds the trie for `entries`, which must be non-empty, sorted, free of
    /// duplicates and all of equal length.
    fn build(entries: &[(BitString, bool)]) -> Edge {
        let (first, value) = &entries[0];
        if entries.len() == 1 {
            return Edge {
                label: first.clone(),
                node: Node::Leaf(*value),
            };
        }

        // Sorted keys: the first and last share the prefix common to all.
        let last = &entries[entries.len() - 1].0;
        let prefix = first.common_prefix_len(last);
        let width = first.len();
        let split = entries.partition_point(|(key, _)| key.get(prefix) == Some(false));

        let strip = |side: &[(BitString, bool)]| -> Vec<(BitString, bool)> {
            side.iter()
                .map(|(key, v)| {
                    let rest = key.range(prefix + 1, width - prefix - 1).unwrap_or_default();
                    (rest, *v)
                })
                .collect()
        };
        let left = Edge::build(&strip(&entries[..split]));
        let right = Edge::build(&strip(&entries[split..]));

        Edge {
            label: first.range(0, prefix).unwrap_or_default(),
            node: Node::Fork(Box::new(left), Box::new(right)),
        }
    }

    fn leaf_count(&self) -> usize {
        match &self.node {
            Node::Leaf(_) => 1,
            Node::Fork(l, r) => l.leaf_count() + r.leaf_count(),
        }
    }

    /// Serializes this edge given `width` unread key bits.
    fn into_cell(self, width: usize) -> Result<Cell, CodecError> {
        let mut b = Builder::new();
        store_label(&mut b, &self.label, width)?;
        match self.node {
            Node::Leaf(value) => {
                b.store_bit(value)?;
            }
            Node::Fork(left, right) => {
                let child_width = width - self.label.len() - 1;
                b.store_ref(left.into_cell(child_width)?)?;
                b.store_ref(right.into_cell(child_width)?)?;
            }
        }
        Ok(b.end_cell())
    }
}

/// `ceil(log2(n + 1))`: bits needed to write any length in `0..=n`.
fn len_bits(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}

fn store_label(b: &mut Builder, label: &BitString, width: usize) -> Result<(), CodecError> {
    let len = label.len();
    let k = len_bits(width);
    let short = 2 + 2 * len;
    let long = 2 + k + len;
    let same = 3 + k;

    if let Some(bit) = label.uniform_bit()
        && same < short.min(long)
    {
        b.store_uint(0b11, 2)?
            .store_bit(bit)?
            .store_uint(len as u128, k)?;
    } else if long < short {
        b.store_uint(0b10, 2)?
            .store_uint(len as u128, k)?
            .store_bits(label)?;
    } else {
        b.store_bit(false)?;
        for _ in 0..len {
            b.store_bit(true)?;
        }
        b.store_bit(false)?.store_bits(label)?;
    }
    Ok(())
}

fn load_label(s: &mut Slice<'_>, width: usize) -> Result<BitString, CodecError> {
    let k = len_bits(width);
    let label = if !s.load_bit()? {
        let mut len = 0;
        while s.load_bit()? {
            len += 1;
            if len > width {
                return Err(label_too_long(len, width));
            }
        }
        s.load_bits(len)?
    } else if !s.load_bit()? {
        let len = s.load_uint(k)? as usize;
        if len > width {
            return Err(label_too_long(len, width));
        }
        s.load_bits(len)?
    } else {
        let bit = s.load_bit()?;
        let len = s.load_uint(k)? as usize;
        if len > width {
            return Err(label_too_long(len, width));
        }
        BitString::from_bits(std::iter::repeat_n(bit, len))
    };
    Ok(label)
}

fn label_too_long(len: usize, width: usize) -> CodecError {
    CodecError::MalformedDict(format!(
        "label of {len} bits exceeds the {width} key bits remaining"
    ))
}

/// Turns cell-level failures inside a dictionary into `MalformedDict`.
fn malformed(err: CodecError) -> CodecError {
    match err {
        CodecError::Cell(cell) => CodecError::MalformedDict(cell.to_string()),
        other => other,
    }
}

/// Encodes `entries` as a dictionary root, or `None` when there are no entries.
///
/// Insertion order never matters: the map is ordered and the trie shape is a
/// function of the key bits alone.
pub fn encode_dict<K: DictKey>(entries: &BTreeMap<K, bool>) -> Result<Option<Cell>, CodecError> {
    if entries.is_empty() {
        return Ok(None);
    }

    let keyed: Vec<(BitString, bool)> = entries.iter().map(|(k, v)| (k.to_bits(), *v)).collect();
    let root = Edge::build(&keyed);
    debug_assert_eq!(root.leaf_count(), keyed.len(), "every key owns exactly one leaf");

    let cell = root.into_cell(K::BITS)?;
    debug!(
        "encoded {}-bit dictionary with {} entries, depth {}",
        K::BITS,
        entries.len(),
        cell.depth()
    );
    Ok(Some(cell))
}

/// Decodes a dictionary rooted at `root` with `key_bits`-wide keys.
///
/// Keys come back as raw bit strings in trie order (ascending).
pub fn decode_dict_bits(root: &Cell, key_bits: usize) -> Result<Vec<(BitString, bool)>, CodecError> {
    let mut out = Vec::new();
    decode_edge(root, BitString::new(), key_bits, &mut out).map_err(malformed)?;
    Ok(out)
}

fn decode_edge(
    cell: &Cell,
    mut prefix: BitString,
    width: usize,
    out: &mut Vec<(BitString, bool)>,
) -> Result<(), CodecError> {
    let mut s = cell.parse();
    let label = load_label(&mut s, width)?;
    let rest = width - label.len();
    prefix.append(&label);

    if rest == 0 {
        let value = s.load_bit()?;
        s.end_parse()?;
        out.push((prefix, value));
        return Ok(());
    }

    if s.remaining_refs() < 2 {
        return Err(CodecError::MalformedDict(format!(
            "fork at {} key bits has {} references, expected 2",
            prefix.len(),
            s.remaining_refs()
        )));
    }
    let left = s.load_ref()?;
    let right = s.load_ref()?;
    s.end_parse()?;

    let mut left_prefix = prefix.clone();
    left_prefix.push(false);
    decode_edge(left, left_prefix, rest - 1, out)?;

    prefix.push(true);
    decode_edge(right, prefix, rest - 1, out)
}

/// Decodes an optional dictionary root into a typed map.
///
/// An absent root is the empty dictionary.
pub fn decode_dict<K: DictKey>(root: Option<&Cell>) -> Result<BTreeMap<K, bool>, CodecError> {
    let Some(root) = root else {
        return Ok(BTreeMap::new());
    };
    decode_dict_bits(root, K::BITS)?
        .into_iter()
        .map(|(bits, value)| {
            K::from_bits(&bits)
                .map(|key| (key, value))
                .ok_or_else(|| CodecError::MalformedDict(format!("key of {} bits", bits.len())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte0: u8, last: u8) -> Hash {
        let mut bytes = [0u8; 32];
        bytes[0] = byte0;
        bytes[31] = last;
        Hash(bytes)
    }

    #[test]
    fn empty_set_is_absent() {
        let empty: BTreeMap<Hash, bool> = BTreeMap::new();
        assert!(encode_dict(&empty).unwrap().is_none());
        assert!(decode_dict::<Hash>(None).unwrap().is_empty());
    }

    #[test]
    fn single_key_uses_long_label() {
        let map = BTreeMap::from([(key(0xAA, 0x01), true)]);
        let cell = encode_dict(&map).unwrap().unwrap();
        // `10` + 9-bit length + 256 label bits + value bit
        assert_eq!(cell.bit_len(), 2 + 9 + 256 + 1);
        assert!(cell.refs().is_empty());
        let mut s = cell.parse();
        assert_eq!(s.load_uint(2).unwrap(), 0b10);
        assert_eq!(s.load_uint(9).unwrap(), 256);
        assert_eq!(decode_dict::<Hash>(Some(&cell)).unwrap(), map);
    }

    #[test]
    fn fork_on_first_bit() {
        let map = BTreeMap::from([(key(0x00, 1), true), (key(0x80, 2), false)]);
        let cell = encode_dict(&map).unwrap().unwrap();
        // Empty short label, then two 255-bit leaves.
        assert_eq!(cell.bit_len(), 2);
        assert_eq!(cell.refs().len(), 2);
        assert_eq!(cell.refs()[0].bit_len(), 2 + 8 + 255 + 1);
        assert_eq!(decode_dict::<Hash>(Some(&cell)).unwrap(), map);
    }

    #[test]
    fn exact_small_trie_layout() {
        let map = BTreeMap::from([(0b0000_0001u8, true), (0b0000_0011u8, false)]);
        let cell = encode_dict(&map).unwrap().unwrap();

        // Root: same-label of six zeros: `11` `0` `0110`.
        assert_eq!(cell.data(), &BitString::from_bits([true, true, false, false, true, true, false]));
        // Leaves: short label `0` `10` `1`, then the value.
        assert_eq!(
            cell.refs()[0].data(),
            &BitString::from_bits([false, true, false, true, true])
        );
        assert_eq!(
            cell.refs()[1].data(),
            &BitString::from_bits([false, true, false, true, false])
        );
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let keys: Vec<Hash> = (0u8..20).map(|i| key(i.wrapping_mul(37), i)).collect();

        let mut forward = BTreeMap::new();
        for (i, k) in keys.iter().enumerate() {
            forward.insert(*k, i % 3 == 0);
        }
        let mut backward = BTreeMap::new();
        for (i, k) in keys.iter().enumerate().rev() {
            backward.insert(*k, i % 3 == 0);
        }

        let a = encode_dict(&forward).unwrap().unwrap();
        let b = encode_dict(&backward).unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.repr_hash(), b.repr_hash());
    }

    #[test]
    fn roundtrip_mixed_values() {
        let mut map = BTreeMap::new();
        for i in 0u8..50 {
            map.insert(key(i.wrapping_mul(151), i.wrapping_mul(7)), i % 2 == 0);
        }
        let cell = encode_dict(&map).unwrap().unwrap();
        assert_eq!(decode_dict::<Hash>(Some(&cell)).unwrap(), map);
    }

    #[test]
    fn roundtrip_u32_keys() {
        let map: BTreeMap<u32, bool> = [0u32, 1, 2, 0xFFFF_FFFF, 0x8000_0000, 12345]
            .into_iter()
            .map(|k| (k, k % 2 == 1))
            .collect();
        let cell = encode_dict(&map).unwrap().unwrap();
        assert_eq!(decode_dict::<u32>(Some(&cell)).unwrap(), map);
    }

    #[test]
    fn integer_keys_use_their_full_width() {
        assert_eq!(<u8 as DictKey>::BITS, 8);
        assert_eq!(<u64 as DictKey>::BITS, 64);
        assert_eq!(0x80u8.to_bits().len(), 8);
        assert_eq!(u64::MAX.to_bits().len(), 64);
        assert_eq!(u16::from_bits(&0xBEEFu16.to_bits()), Some(0xBEEF));
        assert_eq!(u16::from_bits(&0xBEu8.to_bits()), None);

        let map = BTreeMap::from([(0u64, false), (u64::MAX, true)]);
        let cell = encode_dict(&map).unwrap().unwrap();
        assert_eq!(decode_dict::<u64>(Some(&cell)).unwrap(), map);
    }

    #[test]
    fn decode_bits_reports_keys_in_order() {
        let map = BTreeMap::from([(3u8, true), (1u8, false)]);
        let cell = encode_dict(&map).unwrap().unwrap();
        let entries = decode_dict_bits(&cell, 8).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(u8::from_bits(&entries[0].0), Some(1));
        assert_eq!(u8::from_bits(&entries[1].0), Some(3));
    }

    #[test]
    fn label_longer_than_key_is_malformed() {
        let mut b = Builder::new();
        // long label claiming 9 bits for an 8-bit key
        b.store_uint(0b10, 2).unwrap().store_uint(9, 4).unwrap();
        let cell = b.end_cell();
        assert!(matches!(
            decode_dict::<u8>(Some(&cell)),
            Err(CodecError::MalformedDict(_))
        ));
    }

    #[test]
    fn fork_without_references_is_malformed() {
        let mut b = Builder::new();
        b.store_uint(0, 2).unwrap();
        let cell = b.end_cell();
        assert!(matches!(
            decode_dict::<u8>(Some(&cell)),
            Err(CodecError::MalformedDict(_))
        ));
    }

    #[test]
    fn truncated_leaf_is_malformed() {
        let mut b = Builder::new();
        b.store_uint(0b11, 2)
            .unwrap()
            .store_bit(true)
            .unwrap()
            .store_uint(8, 4)
            .unwrap();
        let cell = b.end_cell();
        assert!(matches!(
            decode_dict::<u8>(Some(&cell)),
            Err(CodecError::MalformedDict(_))
        ));

        let mut b = Builder::new();
        b.store_uint(0b11, 2)
            .unwrap()
            .store_bit(true)
            .unwrap()
            .store_uint(8, 4)
            .unwrap()
            .store_bit(true)
            .unwrap();
        let cell = b.end_cell();
        assert_eq!(
            decode_dict::<u8>(Some(&cell)).unwrap(),
            BTreeMap::from([(0xFFu8, true)])
        );
    }

    #[test]
    fn len_bits_matches_width_table() {
        assert_eq!(len_bits(0), 0);
        assert_eq!(len_bits(1), 1);
        assert_eq!(len_bits(8), 4);
        assert_eq!(len_bits(255), 8);
        assert_eq!(len_bits(256), 9);
    }
}
