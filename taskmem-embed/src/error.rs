//! Error types for the `taskmem-embed` crate.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while loading the model or generating embeddings.
///
/// Callers on the query path treat every variant the same way: the encoder
/// is unavailable and semantic search degrades to empty results.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The embedding model could not be loaded.
    #[error("failed to initialize embedding model: {0}")]
    ModelInit(String),

    /// The model loaded but inference failed or produced unusable output.
    #[error("failed to generate embedding: {0}")]
    Inference(String),

    /// Inference did not complete within the configured bound.
    #[error("embedding timed out after {0:?}")]
    Timeout(Duration),

    /// The blocking inference task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A convenience result type for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedError>;
