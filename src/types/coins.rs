//! Coin amounts in nanocoins.

use crate::error::CodecError;
use std::fmt;
use std::str::FromStr;

/// Nanocoins per whole coin.
pub const NANO_PER_COIN: u128 = 1_000_000_000;

/// Maximum payload length of the `var_uint 16` coin encoding, in bytes.
pub const MAX_COIN_BYTES: usize = 15;

/// Non-negative coin amount in nanocoins.
///
/// Serialized as a 4-bit byte length followed by that many big-endian bytes,
/// so only values below `2^120` are representable on the wire. The type itself
/// holds any `u128`; the range check happens when storing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Coins(pub u128);

impl Coins {
    pub const ZERO: Coins = Coins(0);

    /// Largest amount the wire encoding can carry.
    pub const MAX: Coins = Coins((1u128 << (MAX_COIN_BYTES * 8)) - 1);

    pub const fn from_nano(nano: u128) -> Self {
        Coins(nano)
    }

    pub const fn nano(self) -> u128 {
        self.0
    }

    /// Minimum number of bytes needed for the big-endian payload; zero for zero.
    pub const fn byte_len(self) -> usize {
        (128 - self.0.leading_zeros() as usize).div_ceil(8)
    }
}

impl TryFrom<i128> for Coins {
    type Error = CodecError;

    /// Accepts integers as returned on the VM stack; negatives are rejected.
    fn try_from(value: i128) -> Result<Self, Self::Error> {
        u128::try_from(value)
            .map(Coins)
            .map_err(|_| CodecError::ValueOutOfRange(format!("negative coin amount {value}")))
    }
}

impl FromStr for Coins {
    type Err = CodecError;

    /// Parses a decimal amount of whole coins, e.g. `"0.5"` or `"12"`, with at
    /// most nine fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::ValueOutOfRange(format!("invalid coin amount {s:?}"));
        let (int, frac) = s.split_once('.').unwrap_or((s, ""));
        if int.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > 9 || !int.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: u128 = if int.is_empty() {
            0
        } else {
            int.parse().map_err(|_| invalid())?
        };
        let mut nano_frac: u128 = if frac.is_empty() {
            0
        } else {
            frac.parse().map_err(|_| invalid())?
        };
        for _ in frac.len()..9 {
            nano_frac *= 10;
        }

        whole
            .checked_mul(NANO_PER_COIN)
            .and_then(|n| n.checked_add(nano_frac))
            .map(Coins)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Coins {
    /// Whole-coin decimal with trailing zeros trimmed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / NANO_PER_COIN;
        let frac = self.0 % NANO_PER_COIN;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:09}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_len_is_minimal() {
        assert_eq!(Coins(0).byte_len(), 0);
        assert_eq!(Coins(1).byte_len(), 1);
        assert_eq!(Coins(255).byte_len(), 1);
        assert_eq!(Coins(256).byte_len(), 2);
        assert_eq!(Coins::MAX.byte_len(), 15);
        assert_eq!(Coins(Coins::MAX.0 + 1).byte_len(), 16);
    }

    #[test]
    fn parse_decimal_amounts() {
        assert_eq!("0.5".parse::<Coins>().unwrap(), Coins(500_000_000));
        assert_eq!("1.5".parse::<Coins>().unwrap(), Coins(1_500_000_000));
        assert_eq!("0.1".parse::<Coins>().unwrap(), Coins(100_000_000));
        assert_eq!("3".parse::<Coins>().unwrap(), Coins(3 * NANO_PER_COIN));
        assert_eq!(".25".parse::<Coins>().unwrap(), Coins(250_000_000));
        assert_eq!("0.000000001".parse::<Coins>().unwrap(), Coins(1));
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", ".", "-1", "1.0000000001", "abc", "1.2.3"] {
            assert!(bad.parse::<Coins>().is_err(), "{bad}");
        }
    }

    #[test]
    fn display_trims_fraction() {
        assert_eq!(Coins(1_500_000_000).to_string(), "1.5");
        assert_eq!(Coins(2 * NANO_PER_COIN).to_string(), "2");
        assert_eq!(Coins(1).to_string(), "0.000000001");
    }

    #[test]
    fn negative_stack_values_are_rejected() {
        assert_eq!(Coins::try_from(42i128).unwrap(), Coins(42));
        assert!(matches!(
            Coins::try_from(-1i128),
            Err(CodecError::ValueOutOfRange(_))
        ));
    }
}
