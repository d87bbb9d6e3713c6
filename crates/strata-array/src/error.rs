//! Array-specific error types.

use std::error::Error;
use std::fmt;

use strata_core::StorageError;

/// Errors from array construction, reshaping, and checked indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// The flat backing allocation could not be acquired.
    AllocationFailed(StorageError),
    /// An index fell outside the extent of its axis.
    ///
    /// Signals a caller bug; it is reported before any access happens
    /// and is never recovered from internally.
    IndexOutOfBounds {
        /// Axis on which the violation occurred (0 is the outermost).
        axis: usize,
        /// The offending index.
        index: usize,
        /// The extent of that axis.
        extent: usize,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed(source) => {
                write!(f, "array storage allocation failed: {source}")
            }
            Self::IndexOutOfBounds {
                axis,
                index,
                extent,
            } => {
                write!(
                    f,
                    "index {index} out of bounds for axis {axis} with extent {extent}"
                )
            }
        }
    }
}

impl Error for ArrayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AllocationFailed(source) => Some(source),
            Self::IndexOutOfBounds { .. } => None,
        }
    }
}

impl From<StorageError> for ArrayError {
    fn from(source: StorageError) -> Self {
        Self::AllocationFailed(source)
    }
}
