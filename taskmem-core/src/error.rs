//! Error types for the `taskmem-core` crate.

use thiserror::Error;

use crate::record::RecordId;

/// Errors surfaced by record store implementations and tool execution.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record id has no corresponding record in the store.
    #[error("record {id} not found")]
    RecordNotFound {
        /// The id that failed to resolve.
        id: RecordId,
    },

    /// The underlying record store failed.
    #[error("record store error: {0}")]
    Store(String),

    /// A tool was called with malformed or missing arguments.
    #[error("invalid tool arguments: {0}")]
    InvalidArguments(String),

    /// A tool failed while executing.
    #[error("tool error: {0}")]
    Tool(String),
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
