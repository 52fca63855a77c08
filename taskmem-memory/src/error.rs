//! Error types for the `taskmem-memory` crate.

use thiserror::Error;

/// Errors that can occur in memory service operations.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// An error propagated from the encoder.
    #[error(transparent)]
    Embed(#[from] taskmem_embed::EmbedError),

    /// An error propagated from the vector index.
    #[error(transparent)]
    Index(#[from] taskmem_index::IndexError),

    /// An error propagated from the record store or tool layer.
    #[error(transparent)]
    Core(#[from] taskmem_core::CoreError),

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A convenience result type for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;
