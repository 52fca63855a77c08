//! Keeps the vector index consistent with record store mutations.

use std::sync::Arc;

use async_trait::async_trait;
use taskmem_core::{RecordId, RecordObserver, TaskRecord};
use taskmem_embed::{ContentMode, Encoder};
use taskmem_index::VectorIndex;
use tracing::{debug, warn};

use crate::content::indexable_content;

/// Record lifecycle observer that mirrors mutations into the vector index.
///
/// Indexing is best-effort relative to the primary mutation: an encode or
/// upsert failure is logged and swallowed so the record operation that
/// triggered it still succeeds, leaving the record temporarily unindexed
/// until the next reindex. Deletion is synchronous with the store's delete
/// notification — the index must never outlive its owning record.
///
/// The store delivers notifications at-least-once; both the upsert and the
/// delete below are idempotent, so duplicate deliveries are safe.
pub struct SyncHook {
    encoder: Arc<dyn Encoder>,
    index: Arc<VectorIndex>,
}

impl SyncHook {
    /// Create a hook over the given encoder and index.
    pub fn new(encoder: Arc<dyn Encoder>, index: Arc<VectorIndex>) -> Self {
        Self { encoder, index }
    }

    /// Encode a record's indexable content and upsert it into the index.
    async fn index_record(&self, record: &TaskRecord) {
        let content = indexable_content(record);
        let embedding = match self.encoder.encode(&content, ContentMode::Document).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(id = %record.id, error = %e, "failed to encode record, left unindexed");
                return;
            }
        };
        if let Err(e) = self.index.upsert(record.id, embedding).await {
            warn!(id = %record.id, error = %e, "failed to upsert record, left unindexed");
            return;
        }
        debug!(id = %record.id, "record indexed");
    }
}

#[async_trait]
impl RecordObserver for SyncHook {
    async fn on_created(&self, record: &TaskRecord) {
        self.index_record(record).await;
    }

    async fn on_updated(&self, record: &TaskRecord) {
        self.index_record(record).await;
    }

    async fn on_deleted(&self, id: RecordId) {
        self.index.delete(id).await;
        debug!(%id, "record removed from index");
    }
}
