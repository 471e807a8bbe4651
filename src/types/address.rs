//! Standard internal addresses.

use crate::error::CodecError;
use crate::types::hash::Hash;
use std::fmt;
use std::str::FromStr;

/// Basechain id.
pub const BASECHAIN: i8 = 0;
/// Masterchain id.
pub const MASTERCHAIN: i8 = -1;

/// Account address: signed workchain id plus 256-bit account id.
///
/// On the wire this is the `addr_std` form: tag `10`, anycast flag `0`,
/// 8-bit workchain, 256-bit account id. See
/// [`Builder::store_address`](crate::cell::Builder::store_address).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Address {
    pub workchain: i8,
    pub hash: Hash,
}

impl Address {
    pub const fn new(workchain: i8, hash: Hash) -> Self {
        Self { workchain, hash }
    }

    /// Address on the basechain.
    pub const fn basechain(hash: Hash) -> Self {
        Self::new(BASECHAIN, hash)
    }
}

impl fmt::Display for Address {
    /// Raw form, `<workchain>:<64 hex chars>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, self.hash)
    }
}

impl FromStr for Address {
    type Err = CodecError;

    /// Parses the raw form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::InvalidAddress(s.to_string());
        let (wc, hex) = s.split_once(':').ok_or_else(invalid)?;
        let workchain = wc.parse::<i8>().map_err(|_| invalid())?;
        let hash = Hash::from_hex(hex).ok_or_else(invalid)?;
        Ok(Address::new(workchain, hash))
    }
}
