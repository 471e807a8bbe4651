use crate::cell::MAX_BITS;
use raffle_codec_derive::Error;

/// Errors raised while writing to a [`Builder`](super::Builder) or reading a
/// [`Slice`](super::Slice).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    /// Writing would push the cell past its bit budget.
    #[error("cell capacity exceeded: {used} bits used, {requested} more requested")]
    CapacityExceeded { used: usize, requested: usize },
    /// Value does not fit the declared width.
    #[error("value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: String, bits: usize },
    /// The builder already holds four references.
    #[error("too many references (max 4)")]
    TooManyReferences,
    /// Read past the end of the cell data.
    #[error("cell underflow: {requested} bits requested, {remaining} remaining")]
    CellUnderflow { requested: usize, remaining: usize },
    /// Read past the last reference.
    #[error("missing reference at index {0}")]
    MissingReference(usize),
    /// Address prefix other than `addr_none` or anycast-free `addr_std`.
    #[error("unsupported address tag {0:#04b}")]
    InvalidAddressTag(u8),
    /// `end_parse` found unread content.
    #[error("unconsumed cell content: {bits} bits, {refs} references")]
    TrailingData { bits: usize, refs: usize },
}

impl CellError {
    pub(crate) fn capacity(used: usize, requested: usize) -> Self {
        debug_assert!(used + requested > MAX_BITS);
        CellError::CapacityExceeded { used, requested }
    }

    pub(crate) fn out_of_range(value: impl ToString, bits: usize) -> Self {
        CellError::ValueOutOfRange {
            value: value.to_string(),
            bits,
        }
    }
}
