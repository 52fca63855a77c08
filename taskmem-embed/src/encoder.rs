//! Encoder trait and the content-mode tag applied before tokenization.

use async_trait::async_trait;

use crate::error::Result;

/// How a piece of text is about to be used.
///
/// The underlying model was trained with asymmetric prefixes: text indexed
/// as a document and text used as a search query must be tagged differently
/// or relevance silently degrades. The encoder contract therefore forces a
/// mode at every call site instead of defaulting one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentMode {
    /// Text being indexed for later retrieval.
    Document,
    /// Text being used to search the index.
    Query,
}

impl ContentMode {
    /// The training-time prefix for this mode.
    pub fn prefix(self) -> &'static str {
        match self {
            ContentMode::Document => "search_document: ",
            ContentMode::Query => "search_query: ",
        }
    }

    /// Prepend this mode's prefix to `text`.
    pub fn apply(self, text: &str) -> String {
        format!("{}{}", self.prefix(), text)
    }
}

/// A provider that turns text into fixed-length vectors.
///
/// Encoding is deterministic: identical `(text, mode)` input yields a
/// bitwise-identical vector. Every returned vector has exactly
/// [`dimensions()`](Encoder::dimensions) components.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Encode a single text in the given mode.
    async fn encode(&self, text: &str, mode: ContentMode) -> Result<Vec<f32>>;

    /// Encode a batch of texts in the given mode.
    ///
    /// The default implementation encodes sequentially. Backends with native
    /// batching should override it; the reindex path encodes page-at-a-time
    /// through this method.
    async fn encode_batch(&self, texts: &[&str], mode: ContentMode) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.encode(text, mode).await?);
        }
        Ok(results)
    }

    /// The dimensionality of every vector this encoder produces.
    fn dimensions(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_and_query_prefixes_differ() {
        assert_ne!(ContentMode::Document.prefix(), ContentMode::Query.prefix());
    }

    #[test]
    fn apply_prepends_prefix() {
        assert_eq!(
            ContentMode::Document.apply("fix login bug"),
            "search_document: fix login bug"
        );
        assert_eq!(ContentMode::Query.apply("login bug"), "search_query: login bug");
    }
}
