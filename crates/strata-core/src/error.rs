//! Error types for storage acquisition.

use std::error::Error;
use std::fmt;

/// Errors from the backing-storage layer.
///
/// There is no partial-success state: a failed request leaves nothing
/// allocated, and the error is propagated to the caller rather than
/// retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The backing-storage request could not be satisfied.
    AllocationFailed {
        /// Number of bytes that were requested.
        requested_bytes: usize,
        /// Human-readable tag of the element type, for diagnostics only.
        type_name: &'static str,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed {
                requested_bytes,
                type_name,
            } => {
                write!(
                    f,
                    "storage allocation failed: {requested_bytes} bytes of {type_name}"
                )
            }
        }
    }
}

impl Error for StorageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_type_and_size() {
        let err = StorageError::AllocationFailed {
            requested_bytes: 4096,
            type_name: "f32",
        };
        assert_eq!(
            err.to_string(),
            "storage allocation failed: 4096 bytes of f32"
        );
    }
}
