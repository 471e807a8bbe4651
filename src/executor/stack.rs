//! Values exchanged with get-methods.

use crate::cell::Cell;
use crate::error::CodecError;

/// One entry of a get-method argument list or result tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackValue {
    Null,
    /// Integer entry. Contract integers are 257-bit; everything the raffle
    /// returns fits in 128.
    Int(i128),
    Cell(Cell),
    /// Slice entry, carried as the cell it reads from.
    Slice(Cell),
}

impl StackValue {
    /// Returns the type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            StackValue::Null => "null",
            StackValue::Int(_) => "int",
            StackValue::Cell(_) => "cell",
            StackValue::Slice(_) => "slice",
        }
    }

    fn mismatch(&self, index: usize, expected: &str) -> CodecError {
        CodecError::DecodeFailure(format!(
            "stack entry {index}: expected {expected}, got {}",
            self.type_name()
        ))
    }

    /// Returns the integer at stack position `index`.
    pub fn as_int(&self, index: usize) -> Result<i128, CodecError> {
        match self {
            StackValue::Int(v) => Ok(*v),
            other => Err(other.mismatch(index, "int")),
        }
    }

    /// Returns the cell behind a slice entry.
    pub fn as_slice(&self, index: usize) -> Result<&Cell, CodecError> {
        match self {
            StackValue::Slice(c) => Ok(c),
            other => Err(other.mismatch(index, "slice")),
        }
    }

    /// Returns a cell entry, or `None` for a null entry.
    pub fn as_cell_opt(&self, index: usize) -> Result<Option<&Cell>, CodecError> {
        match self {
            StackValue::Null => Ok(None),
            StackValue::Cell(c) => Ok(Some(c)),
            other => Err(other.mismatch(index, "cell or null")),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StackValue::Null)
    }
}

impl From<Option<Cell>> for StackValue {
    fn from(cell: Option<Cell>) -> Self {
        cell.map_or(StackValue::Null, StackValue::Cell)
    }
}
