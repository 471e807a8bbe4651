//! Bit-packed cell trees.
//!
//! A [`Cell`] holds up to [`MAX_BITS`] data bits and up to [`MAX_REFS`] child
//! cells. Cells are written once through a [`Builder`] and read back with a
//! [`Slice`].
//!
//! # Modules
//!
//! - [`bits`]: MSB-first bit string backing cell data
//! - [`builder`]: append-only writer with budget checks
//! - [`slice`]: sequential reader
//! - [`tree`]: finalized cells, representation hash and tree display
//! - [`errors`]: bit-level error type

pub mod bits;
pub mod builder;
pub mod errors;
pub mod slice;
pub mod tree;

pub use bits::BitString;
pub use builder::{Builder, COINS_LEN_BITS, STD_ADDRESS_BITS};
pub use errors::CellError;
pub use slice::Slice;
pub use tree::Cell;

/// Data bits per cell.
pub const MAX_BITS: usize = 1023;

/// Child references per cell.
pub const MAX_REFS: usize = 4;
