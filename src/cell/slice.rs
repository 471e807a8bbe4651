//! Sequential reader over a cell.

use crate::cell::bits::BitString;
use crate::cell::builder::COINS_LEN_BITS;
use crate::cell::errors::CellError;
use crate::cell::tree::Cell;
use crate::types::address::Address;
use crate::types::coins::Coins;
use crate::types::hash::{HASH_LEN, Hash};

/// Read cursor over one cell's bits and references.
///
/// Reads advance the cursor only on success.
#[derive(Clone, Debug)]
pub struct Slice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> Slice<'a> {
    pub fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    pub fn remaining_refs(&self) -> usize {
        self.cell.refs().len() - self.ref_pos
    }

    fn ensure_bits(&self, requested: usize) -> Result<(), CellError> {
        let remaining = self.remaining_bits();
        if requested > remaining {
            return Err(CellError::CellUnderflow {
                requested,
                remaining,
            });
        }
        Ok(())
    }

    fn bit_at(&self, offset: usize) -> bool {
        self.cell.data().get(self.bit_pos + offset).unwrap_or(false)
    }

    pub fn load_bit(&mut self) -> Result<bool, CellError> {
        self.ensure_bits(1)?;
        let bit = self.bit_at(0);
        self.bit_pos += 1;
        Ok(bit)
    }

    /// Reads a `bits`-wide unsigned integer (`bits <= 128`).
    pub fn load_uint(&mut self, bits: usize) -> Result<u128, CellError> {
        if bits > 128 {
            return Err(CellError::out_of_range("u128", bits));
        }
        self.ensure_bits(bits)?;
        let value = (0..bits).fold(0u128, |acc, i| (acc << 1) | self.bit_at(i) as u128);
        self.bit_pos += bits;
        Ok(value)
    }

    /// Reads a `bits`-wide two's-complement integer (`1 <= bits <= 128`).
    pub fn load_int(&mut self, bits: usize) -> Result<i128, CellError> {
        if bits == 0 || bits > 128 {
            return Err(CellError::out_of_range("i128", bits));
        }
        let raw = self.load_uint(bits)?;
        if bits == 128 {
            return Ok(raw as i128);
        }
        let sign = 1u128 << (bits - 1);
        Ok(if raw & sign != 0 {
            (raw as i128) - (1i128 << bits)
        } else {
            raw as i128
        })
    }

    pub fn load_bits(&mut self, bits: usize) -> Result<BitString, CellError> {
        self.ensure_bits(bits)?;
        let out = BitString::from_bits((0..bits).map(|i| self.bit_at(i)));
        self.bit_pos += bits;
        Ok(out)
    }

    pub fn load_bytes(&mut self, len: usize) -> Result<Vec<u8>, CellError> {
        self.ensure_bits(len * 8)?;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.load_uint(8)? as u8);
        }
        Ok(out)
    }

    pub fn skip(&mut self, bits: usize) -> Result<(), CellError> {
        self.ensure_bits(bits)?;
        self.bit_pos += bits;
        Ok(())
    }

    /// Reads an address that may be `addr_none`.
    ///
    /// Only `addr_none$00` and `addr_std$10` without anycast are accepted.
    pub fn load_address_opt(&mut self) -> Result<Option<Address>, CellError> {
        self.ensure_bits(2)?;
        let tag = (self.bit_at(0) as u8) << 1 | self.bit_at(1) as u8;
        match tag {
            0b00 => {
                self.bit_pos += 2;
                Ok(None)
            }
            0b10 => {
                self.ensure_bits(crate::cell::STD_ADDRESS_BITS)?;
                if self.bit_at(2) {
                    return Err(CellError::InvalidAddressTag(tag));
                }
                self.bit_pos += 3;
                let workchain = self.load_int(8)? as i8;
                let bytes = self.load_bytes(HASH_LEN)?;
                let hash = Hash::from_slice(&bytes).unwrap_or_default();
                Ok(Some(Address::new(workchain, hash)))
            }
            other => Err(CellError::InvalidAddressTag(other)),
        }
    }

    /// Reads a standard address; `addr_none` is an error here.
    pub fn load_address(&mut self) -> Result<Address, CellError> {
        self.load_address_opt()?
            .ok_or(CellError::InvalidAddressTag(0b00))
    }

    pub fn load_coins(&mut self) -> Result<Coins, CellError> {
        let start = self.bit_pos;
        let len = self.load_uint(COINS_LEN_BITS)? as usize;
        match self.load_uint(len * 8) {
            Ok(value) => Ok(Coins(value)),
            Err(err) => {
                self.bit_pos = start;
                Err(err)
            }
        }
    }

    pub fn load_ref(&mut self) -> Result<&'a Cell, CellError> {
        let cell = self
            .cell
            .reference(self.ref_pos)
            .ok_or(CellError::MissingReference(self.ref_pos))?;
        self.ref_pos += 1;
        Ok(cell)
    }

    /// Reads the optional-dictionary form written by
    /// [`Builder::store_dict`](super::Builder::store_dict).
    pub fn load_dict(&mut self) -> Result<Option<&'a Cell>, CellError> {
        self.ensure_bits(1)?;
        if !self.bit_at(0) {
            self.bit_pos += 1;
            return Ok(None);
        }
        if self.remaining_refs() == 0 {
            return Err(CellError::MissingReference(self.ref_pos));
        }
        self.bit_pos += 1;
        self.load_ref().map(Some)
    }

    /// Fails unless every bit and reference has been read.
    pub fn end_parse(&self) -> Result<(), CellError> {
        let bits = self.remaining_bits();
        let refs = self.remaining_refs();
        if bits != 0 || refs != 0 {
            return Err(CellError::TrailingData { bits, refs });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Builder;

    #[test]
    fn reads_follow_writes() {
        let mut b = Builder::new();
        b.store_uint(2001, 32)
            .unwrap()
            .store_int(-5, 16)
            .unwrap()
            .store_bit(true)
            .unwrap()
            .store_bytes(&[0xDE, 0xAD])
            .unwrap();
        let cell = b.end_cell();
        let mut s = cell.parse();
        assert_eq!(s.load_uint(32).unwrap(), 2001);
        assert_eq!(s.load_int(16).unwrap(), -5);
        assert!(s.load_bit().unwrap());
        assert_eq!(s.load_bytes(2).unwrap(), vec![0xDE, 0xAD]);
        s.end_parse().unwrap();
    }

    #[test]
    fn underflow_does_not_advance() {
        let mut b = Builder::new();
        b.store_uint(3, 4).unwrap();
        let cell = b.end_cell();
        let mut s = cell.parse();
        assert!(matches!(
            s.load_uint(8),
            Err(CellError::CellUnderflow {
                requested: 8,
                remaining: 4
            })
        ));
        assert_eq!(s.load_uint(4).unwrap(), 3);
    }

    #[test]
    fn address_roundtrip() {
        let addr = Address::new(-1, Hash([0x42; 32]));
        let mut b = Builder::new();
        b.store_address(&addr).unwrap().store_address_opt(None).unwrap();
        let cell = b.end_cell();
        let mut s = cell.parse();
        assert_eq!(s.load_address().unwrap(), addr);
        assert_eq!(s.load_address_opt().unwrap(), None);
        s.end_parse().unwrap();
    }

    #[test]
    fn address_none_rejected_where_required() {
        let mut b = Builder::new();
        b.store_uint(0, 2).unwrap();
        let cell = b.end_cell();
        assert!(matches!(
            cell.parse().load_address(),
            Err(CellError::InvalidAddressTag(0))
        ));
    }

    #[test]
    fn external_address_tag_rejected() {
        let mut b = Builder::new();
        b.store_uint(0b01, 2).unwrap();
        let cell = b.end_cell();
        assert!(matches!(
            cell.parse().load_address_opt(),
            Err(CellError::InvalidAddressTag(0b01))
        ));
    }

    #[test]
    fn coins_roundtrip_boundaries() {
        for amount in [Coins::ZERO, Coins(1), Coins(500_000_000), Coins::MAX] {
            let mut b = Builder::new();
            b.store_coins(amount).unwrap();
            let cell = b.end_cell();
            let mut s = cell.parse();
            assert_eq!(s.load_coins().unwrap(), amount);
            s.end_parse().unwrap();
        }
    }

    #[test]
    fn missing_reference() {
        let cell = Builder::new().end_cell();
        assert!(matches!(
            cell.parse().load_ref(),
            Err(CellError::MissingReference(0))
        ));
    }

    #[test]
    fn end_parse_reports_leftovers() {
        let mut b = Builder::new();
        b.store_bit(false).unwrap().store_ref(Cell::default()).unwrap();
        let cell = b.end_cell();
        assert!(matches!(
            cell.parse().end_parse(),
            Err(CellError::TrailingData { bits: 1, refs: 1 })
        ));
    }
}
