//! Append-only cell builder.

use crate::cell::bits::BitString;
use crate::cell::errors::CellError;
use crate::cell::tree::Cell;
use crate::cell::{MAX_BITS, MAX_REFS};
use crate::types::address::Address;
use crate::types::coins::{Coins, MAX_COIN_BYTES};
use crate::types::hash::HASH_BITS;

/// Bits taken by an `addr_std` address without anycast.
pub const STD_ADDRESS_BITS: usize = 2 + 1 + 8 + HASH_BITS;

/// Width of the coin length prefix.
pub const COINS_LEN_BITS: usize = 4;

/// Staging buffer for a single [`Cell`].
///
/// Every `store_*` call checks the bit and reference budgets before writing,
/// so a failed call leaves the builder untouched. [`Builder::end_cell`]
/// consumes the builder; nothing can be written after finalization.
#[derive(Debug, Default)]
pub struct Builder {
    data: BitString,
    refs: Vec<Cell>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bits_used(&self) -> usize {
        self.data.len()
    }

    pub fn bits_left(&self) -> usize {
        MAX_BITS - self.data.len()
    }

    pub fn refs_used(&self) -> usize {
        self.refs.len()
    }

    fn ensure_bits(&self, requested: usize) -> Result<(), CellError> {
        if requested > self.bits_left() {
            return Err(CellError::capacity(self.data.len(), requested));
        }
        Ok(())
    }

    fn ensure_ref(&self) -> Result<(), CellError> {
        if self.refs.len() >= MAX_REFS {
            return Err(CellError::TooManyReferences);
        }
        Ok(())
    }

    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellError> {
        self.ensure_bits(1)?;
        self.data.push(bit);
        Ok(self)
    }

    /// Appends `value` as a `bits`-wide unsigned integer, MSB first.
    pub fn store_uint(&mut self, value: u128, bits: usize) -> Result<&mut Self, CellError> {
        if bits > 128 || (bits < 128 && value >> bits != 0) {
            return Err(CellError::out_of_range(value, bits));
        }
        self.ensure_bits(bits)?;
        self.data.push_uint(value, bits);
        Ok(self)
    }

    /// Appends `value` as a `bits`-wide two's-complement integer.
    pub fn store_int(&mut self, value: i128, bits: usize) -> Result<&mut Self, CellError> {
        let fits = match bits {
            0 => value == 0,
            1..=127 => {
                let bound = 1i128 << (bits - 1);
                (-bound..bound).contains(&value)
            }
            128 => true,
            _ => false,
        };
        if !fits {
            return Err(CellError::out_of_range(value, bits));
        }
        self.ensure_bits(bits)?;
        self.data.push_uint(value as u128, bits);
        Ok(self)
    }

    /// Appends `n` zero bits.
    pub fn store_zeros(&mut self, n: usize) -> Result<&mut Self, CellError> {
        self.ensure_bits(n)?;
        for _ in 0..n {
            self.data.push(false);
        }
        Ok(self)
    }

    pub fn store_bits(&mut self, bits: &BitString) -> Result<&mut Self, CellError> {
        self.ensure_bits(bits.len())?;
        self.data.append(bits);
        Ok(self)
    }

    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, CellError> {
        self.ensure_bits(bytes.len() * 8)?;
        for byte in bytes {
            self.data.push_uint(*byte as u128, 8);
        }
        Ok(self)
    }

    /// Appends `addr_std$10`, anycast `0`, 8-bit workchain, 256-bit account id.
    pub fn store_address(&mut self, addr: &Address) -> Result<&mut Self, CellError> {
        self.ensure_bits(STD_ADDRESS_BITS)?;
        self.data.push_uint(0b10, 2);
        self.data.push(false);
        self.data.push_uint(addr.workchain as u8 as u128, 8);
        for byte in addr.hash.0 {
            self.data.push_uint(byte as u128, 8);
        }
        Ok(self)
    }

    /// Like [`Builder::store_address`], writing `addr_none$00` for `None`.
    pub fn store_address_opt(&mut self, addr: Option<&Address>) -> Result<&mut Self, CellError> {
        match addr {
            Some(addr) => self.store_address(addr),
            None => self.store_uint(0, 2),
        }
    }

    /// Appends a 4-bit byte length followed by the minimal big-endian payload.
    pub fn store_coins(&mut self, amount: Coins) -> Result<&mut Self, CellError> {
        let len = amount.byte_len();
        if len > MAX_COIN_BYTES {
            return Err(CellError::out_of_range(amount.nano(), MAX_COIN_BYTES * 8));
        }
        self.ensure_bits(COINS_LEN_BITS + len * 8)?;
        self.data.push_uint(len as u128, COINS_LEN_BITS);
        self.data.push_uint(amount.nano(), len * 8);
        Ok(self)
    }

    pub fn store_ref(&mut self, cell: Cell) -> Result<&mut Self, CellError> {
        self.ensure_ref()?;
        self.refs.push(cell);
        Ok(self)
    }

    /// Optional-dictionary form: `1` plus a reference to the root, or a lone `0`.
    pub fn store_dict(&mut self, root: Option<Cell>) -> Result<&mut Self, CellError> {
        match root {
            Some(root) => {
                self.ensure_bits(1)?;
                self.ensure_ref()?;
                self.data.push(true);
                self.refs.push(root);
                Ok(self)
            }
            None => self.store_bit(false),
        }
    }

    /// Finalizes the builder into an immutable cell.
    pub fn end_cell(self) -> Cell {
        Cell::from_parts(self.data, self.refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::hash::Hash;

    #[test]
    fn store_uint_is_msb_first() {
        let mut b = Builder::new();
        b.store_uint(0x05138d91, 32).unwrap();
        let cell = b.end_cell();
        assert_eq!(cell.data().as_bytes(), &[0x05, 0x13, 0x8d, 0x91]);
    }

    #[test]
    fn store_uint_range_check() {
        let mut b = Builder::new();
        assert!(b.store_uint(15, 4).is_ok());
        assert!(matches!(
            b.store_uint(16, 4),
            Err(CellError::ValueOutOfRange { bits: 4, .. })
        ));
        assert_eq!(b.bits_used(), 4);
        assert!(b.store_uint(u128::MAX, 128).is_ok());
        assert!(b.store_uint(0, 129).is_err());
    }

    #[test]
    fn store_int_range_check() {
        let mut b = Builder::new();
        b.store_int(-1, 8).unwrap().store_int(127, 8).unwrap();
        assert_eq!(b.end_cell().data().as_bytes(), &[0xFF, 0x7F]);

        let mut b = Builder::new();
        assert!(b.store_int(128, 8).is_err());
        assert!(b.store_int(-129, 8).is_err());
        assert!(b.store_int(-128, 8).is_ok());
    }

    #[test]
    fn capacity_is_1023_bits() {
        let mut b = Builder::new();
        b.store_zeros(1023).unwrap();
        assert_eq!(b.bits_left(), 0);
        assert!(matches!(
            b.store_bit(true),
            Err(CellError::CapacityExceeded {
                used: 1023,
                requested: 1
            })
        ));
    }

    #[test]
    fn failed_store_leaves_builder_untouched() {
        let mut b = Builder::new();
        b.store_zeros(1000).unwrap();
        assert!(b.store_uint(0, 64).is_err());
        assert_eq!(b.bits_used(), 1000);
    }

    #[test]
    fn fifth_reference_fails() {
        let mut b = Builder::new();
        for _ in 0..4 {
            b.store_ref(Cell::default()).unwrap();
        }
        assert!(matches!(
            b.store_ref(Cell::default()),
            Err(CellError::TooManyReferences)
        ));
        assert!(matches!(
            b.store_dict(Some(Cell::default())),
            Err(CellError::TooManyReferences)
        ));
        assert_eq!(b.bits_used(), 0);
    }

    #[test]
    fn address_layout() {
        let mut hash = [0u8; 32];
        hash[0] = 0xFF;
        let addr = Address::new(-1, Hash(hash));
        let mut b = Builder::new();
        b.store_address(&addr).unwrap();
        let cell = b.end_cell();
        assert_eq!(cell.bit_len(), STD_ADDRESS_BITS);
        let mut s = cell.parse();
        assert_eq!(s.load_uint(3).unwrap(), 0b100);
        assert_eq!(s.load_int(8).unwrap(), -1);
        assert_eq!(s.load_uint(8).unwrap(), 0xFF);
    }

    #[test]
    fn address_none_is_two_zero_bits() {
        let mut b = Builder::new();
        b.store_address_opt(None).unwrap();
        assert_eq!(b.end_cell().bit_len(), 2);
    }

    #[test]
    fn coins_zero_is_length_only() {
        let mut b = Builder::new();
        b.store_coins(Coins::ZERO).unwrap();
        let cell = b.end_cell();
        assert_eq!(cell.bit_len(), 4);
        assert_eq!(cell.parse().load_uint(4).unwrap(), 0);
    }

    #[test]
    fn coins_minimal_length() {
        let mut b = Builder::new();
        b.store_coins(Coins(100_000_000)).unwrap();
        let cell = b.end_cell();
        // 100_000_000 = 0x05F5E100, four bytes
        assert_eq!(cell.bit_len(), 4 + 32);
        let mut s = cell.parse();
        assert_eq!(s.load_uint(4).unwrap(), 4);
        assert_eq!(s.load_uint(32).unwrap(), 0x05F5E100);
    }

    #[test]
    fn coins_max_and_overflow() {
        let mut b = Builder::new();
        b.store_coins(Coins::MAX).unwrap();
        assert_eq!(b.bits_used(), 4 + 120);

        let mut b = Builder::new();
        assert!(matches!(
            b.store_coins(Coins(Coins::MAX.0 + 1)),
            Err(CellError::ValueOutOfRange { .. })
        ));
        assert_eq!(b.bits_used(), 0);
    }

    #[test]
    fn store_dict_marker() {
        let mut b = Builder::new();
        b.store_dict(None).unwrap().store_dict(Some(Cell::default())).unwrap();
        assert_eq!(b.bits_used(), 2);
        assert_eq!(b.refs_used(), 1);
        let cell = b.end_cell();
        let mut s = cell.parse();
        assert!(s.load_dict().unwrap().is_none());
        assert!(s.load_dict().unwrap().is_some());
    }
}
