//! Fastembed-backed encoder with lazy one-time model initialization.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use once_cell::sync::OnceCell;
use tokio::task;
use tracing::{debug, info};

use crate::encoder::{ContentMode, Encoder};
use crate::error::{EmbedError, Result};

/// Native output dimensionality of nomic-embed-text-v1.5.
const NATIVE_DIMENSIONS: usize = 768;

/// Default Matryoshka slice taken from the native output.
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Default upper bound on a single inference call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An [`Encoder`] backed by a locally-run fastembed model.
///
/// The model is not loaded until the first encode call, so hosts that never
/// touch semantic features pay zero startup cost. After the first successful
/// load the model instance is retained for the process lifetime; a `OnceCell`
/// guards against concurrent double-initialization.
///
/// The model natively emits 768-dimensional vectors; the encoder slices each
/// to the first `dimensions` components (Matryoshka truncation). The slice is
/// deterministic and never re-normalized.
///
/// # Example
///
/// ```rust,ignore
/// use taskmem_embed::{ContentMode, Encoder, FastembedEncoder};
///
/// let encoder = FastembedEncoder::new();
/// let vector = encoder.encode("fix login redirect", ContentMode::Query).await?;
/// assert_eq!(vector.len(), encoder.dimensions());
/// ```
pub struct FastembedEncoder {
    model_name: EmbeddingModel,
    dimensions: usize,
    timeout: Duration,
    cache_dir: Option<PathBuf>,
    /// Lazily initialized model handle, loaded at most once.
    model: OnceCell<Arc<TextEmbedding>>,
}

impl FastembedEncoder {
    /// Create an encoder with the default model, dimensions, and timeout.
    pub fn new() -> Self {
        Self {
            model_name: EmbeddingModel::NomicEmbedTextV15,
            dimensions: DEFAULT_DIMENSIONS,
            timeout: DEFAULT_TIMEOUT,
            cache_dir: None,
            model: OnceCell::new(),
        }
    }

    /// Set the output dimensionality (Matryoshka slice width).
    ///
    /// Must not exceed the model's native 768 dimensions; `encode` fails if
    /// the model emits fewer components than configured here.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        debug_assert!(dimensions <= NATIVE_DIMENSIONS);
        self.dimensions = dimensions;
        self
    }

    /// Set the per-call inference timeout.
    ///
    /// A timed-out call is reported as [`EmbedError::Timeout`] and treated by
    /// callers like any other encoder outage.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom cache directory for downloaded model files.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Load the model now instead of on the first encode call.
    ///
    /// Useful for hosts that want the cold-start cost off the interactive
    /// path. No-op if the model is already loaded.
    pub async fn warmup(&self) -> Result<()> {
        if self.model.get().is_some() {
            debug!("embedding model already initialized, skipping warmup");
            return Ok(());
        }
        self.get_or_init_model()?;
        info!(model = ?self.model_name, "embedding model warmed up");
        Ok(())
    }

    fn get_or_init_model(&self) -> Result<Arc<TextEmbedding>> {
        self.model
            .get_or_try_init(|| {
                info!(model = ?self.model_name, "initializing embedding model");

                let mut options =
                    InitOptions::new(self.model_name.clone()).with_show_download_progress(false);
                if let Some(dir) = &self.cache_dir {
                    options = options.with_cache_dir(dir.clone());
                }
                let model = TextEmbedding::try_new(options)
                    .map_err(|e| EmbedError::ModelInit(e.to_string()))?;

                info!(
                    model = ?self.model_name,
                    dimensions = self.dimensions,
                    "embedding model initialized"
                );
                Ok(Arc::new(model))
            })
            .cloned()
    }

    /// Run one inference batch on the blocking pool, bounded by the timeout.
    async fn run_inference(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = self.get_or_init_model()?;
        let timeout = self.timeout;

        let handle = task::spawn_blocking(move || {
            model.embed(inputs, None).map_err(|e| EmbedError::Inference(e.to_string()))
        });

        let joined = tokio::time::timeout(timeout, handle)
            .await
            .map_err(|_| EmbedError::Timeout(timeout))?;
        let raw = joined??;

        raw.into_iter().map(|v| self.slice_dimensions(v)).collect()
    }

    /// Slice a native-width vector to the configured dimensionality.
    fn slice_dimensions(&self, mut vector: Vec<f32>) -> Result<Vec<f32>> {
        if vector.len() < self.dimensions {
            return Err(EmbedError::Inference(format!(
                "model produced {} dimensions, configured slice is {}",
                vector.len(),
                self.dimensions
            )));
        }
        vector.truncate(self.dimensions);
        Ok(vector)
    }
}

impl Default for FastembedEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Encoder for FastembedEncoder {
    async fn encode(&self, text: &str, mode: ContentMode) -> Result<Vec<f32>> {
        let mut vectors = self.run_inference(vec![mode.apply(text)]).await?;
        debug!(mode = ?mode, text_len = text.len(), "generated embedding");
        vectors
            .pop()
            .ok_or_else(|| EmbedError::Inference("empty embedding result".into()))
    }

    async fn encode_batch(&self, texts: &[&str], mode: ContentMode) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let inputs: Vec<String> = texts.iter().map(|t| mode.apply(t)).collect();
        let vectors = self.run_inference(inputs).await?;
        debug!(mode = ?mode, batch_size = vectors.len(), "generated batch embeddings");
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_slice_fits_native_output() {
        let encoder = FastembedEncoder::new();
        assert!(encoder.dimensions() <= NATIVE_DIMENSIONS);
        assert_eq!(encoder.dimensions(), DEFAULT_DIMENSIONS);
    }

    #[test]
    fn slice_truncates_without_renormalizing() {
        let encoder = FastembedEncoder::new().with_dimensions(3);
        let sliced = encoder.slice_dimensions(vec![0.5, -0.25, 0.125, 0.9, 0.9]).unwrap();
        assert_eq!(sliced, vec![0.5, -0.25, 0.125]);
    }

    #[test]
    fn slice_rejects_short_output() {
        let encoder = FastembedEncoder::new().with_dimensions(16);
        let err = encoder.slice_dimensions(vec![0.1; 8]).unwrap_err();
        assert!(matches!(err, EmbedError::Inference(_)));
    }

    // Integration tests below download the model; run with `cargo test -- --ignored`.

    #[tokio::test]
    #[ignore = "downloads model from network, slow"]
    async fn encode_produces_configured_dimensions() {
        let encoder = FastembedEncoder::new();
        let vector = encoder.encode("hello world", ContentMode::Document).await.unwrap();
        assert_eq!(vector.len(), DEFAULT_DIMENSIONS);
        assert!(vector.iter().any(|&x| x != 0.0));
    }

    #[tokio::test]
    #[ignore = "downloads model from network, slow"]
    async fn encode_is_deterministic() {
        let encoder = FastembedEncoder::new();
        let a = encoder.encode("fix the login redirect bug", ContentMode::Query).await.unwrap();
        let b = encoder.encode("fix the login redirect bug", ContentMode::Query).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    #[ignore = "downloads model from network, slow"]
    async fn modes_produce_distinct_vectors() {
        let encoder = FastembedEncoder::new();
        let doc = encoder.encode("database migration", ContentMode::Document).await.unwrap();
        let query = encoder.encode("database migration", ContentMode::Query).await.unwrap();
        assert_ne!(doc, query);
    }
}
