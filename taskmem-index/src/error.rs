//! Error types for the `taskmem-index` crate.

use taskmem_core::RecordId;
use thiserror::Error;

/// Errors that can occur in vector index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A vector of the wrong length was passed in.
    ///
    /// This is a caller error indicating a configuration bug (encoder and
    /// index disagree on dimensionality), not a recoverable condition.
    #[error("dimension mismatch: index holds {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch {
        /// Dimensionality the index was created with.
        expected: usize,
        /// Length of the offending vector.
        actual: usize,
    },

    /// A stored entry no longer matches the index dimensionality.
    ///
    /// Only possible after a dimension or model change without a rebuild.
    /// Fatal for the current query; recovered by a full reindex.
    #[error("index corrupt: entry {id} has {actual} dimensions, index holds {expected}")]
    Corruption {
        /// Id of the corrupt entry.
        id: RecordId,
        /// Dimensionality the index was created with.
        expected: usize,
        /// Length of the stored entry.
        actual: usize,
    },
}

/// A convenience result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
