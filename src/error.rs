//! Crate-level error type.

use crate::cell::CellError;
use crate::types::hash::Hash;
use raffle_codec_derive::Error;

/// Errors produced by an encode or decode call.
///
/// Every error means the call produced nothing usable; there are no partial
/// results.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Bit-level failure while building or reading a cell.
    #[error("cell error: {0}")]
    Cell(#[from] CellError),
    /// A domain value does not fit the field declared for it.
    #[error("value out of range: {0}")]
    ValueOutOfRange(String),
    /// Dictionary trie inconsistent with its key width.
    #[error("malformed dictionary: {0}")]
    MalformedDict(String),
    /// The same key was supplied twice to a dictionary that must not merge.
    #[error("duplicate dictionary key {0}")]
    DuplicateKey(Hash),
    /// The executor reported failure or returned an unexpected shape.
    #[error("decode failure: {0}")]
    DecodeFailure(String),
    /// Raffle state code outside 1..=3.
    #[error("invalid raffle state code {0}")]
    InvalidState(u8),
    /// Address text that is not `<workchain>:<hex>`.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl CodecError {
    /// Returns true for failures caused by values that do not fit their field,
    /// whether detected by a cell builder or by a layout encoder.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            CodecError::ValueOutOfRange(_) | CodecError::Cell(CellError::ValueOutOfRange { .. })
        )
    }
}
