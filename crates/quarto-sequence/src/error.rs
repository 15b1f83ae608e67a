//! Error types for sequence operations

use thiserror::Error;

/// Errors raised by sequence views and the segment builder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// Character index outside the sequence
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Range with `start > end` or `end > len`
    #[error("range [{start}, {end}) out of bounds for sequence of length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    /// Views over different source buffers were combined
    #[error("sequence is based on a different source buffer")]
    BaseMismatch,
}

pub type Result<T> = std::result::Result<T, SequenceError>;

pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(SequenceError::IndexOutOfRange { index, len })
    }
}

pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<()> {
    if start <= end && end <= len {
        Ok(())
    } else {
        Err(SequenceError::RangeOutOfBounds { start, end, len })
    }
}
