//! Core value types shared by the cell codec and the raffle layouts.
//!
//! - `Hash`: 32-byte account ids, dictionary keys and cell hashes
//! - `Address`: workchain + account id, stored in the `addr_std` form
//! - `Coins`: nanocoin amounts, stored with the `var_uint 16` encoding
//! - `EncodeSink`/`Encode`: byte streaming used for cell representation hashing

pub mod address;
pub mod coins;
pub mod encoding;
pub mod hash;
