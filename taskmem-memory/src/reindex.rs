//! Full index rebuild from the authoritative record store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use taskmem_core::{PageCursor, RecordStore, TaskRecord};
use taskmem_embed::{ContentMode, Encoder};
use taskmem_index::VectorIndex;
use tracing::{info, warn};

use crate::content::indexable_content;
use crate::error::Result;

/// Counters reported by a reindex run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReindexSummary {
    /// Records successfully encoded and upserted.
    pub indexed: usize,
    /// Records that failed to encode or upsert (logged, not fatal).
    pub failed: usize,
    /// Pages processed.
    pub pages: usize,
    /// Cursor to resume from; `None` when the store was fully processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<PageCursor>,
}

/// Cancellation handle for a running reindex.
///
/// Cancellation is checked between pages, so a cancelled run stops on the
/// next page boundary with a resumable cursor in its summary.
#[derive(Debug, Clone)]
pub struct ReindexHandle {
    cancelled: Arc<AtomicBool>,
}

impl ReindexHandle {
    /// Request cancellation of the associated run.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Paginated batch rebuild of the vector index.
///
/// Every step is an idempotent upsert, so the job may be interrupted and
/// restarted from the last processed page boundary without producing
/// incorrect state. It is the recovery mechanism after partial indexing
/// failures, bulk imports, and dimension or model changes.
pub struct ReindexJob {
    encoder: Arc<dyn Encoder>,
    index: Arc<VectorIndex>,
    store: Arc<dyn RecordStore>,
    cancelled: Arc<AtomicBool>,
}

impl ReindexJob {
    /// Create a job over the given collaborators.
    pub fn new(
        encoder: Arc<dyn Encoder>,
        index: Arc<VectorIndex>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self { encoder, index, store, cancelled: Arc::new(AtomicBool::new(false)) }
    }

    /// Obtain a handle that can cancel this job between pages.
    pub fn handle(&self) -> ReindexHandle {
        ReindexHandle { cancelled: Arc::clone(&self.cancelled) }
    }

    /// Rebuild the index from the first page of the store.
    ///
    /// # Errors
    ///
    /// Propagates record store failures; per-record encode and upsert
    /// failures are counted in the summary instead.
    pub async fn run(&self, page_size: usize) -> Result<ReindexSummary> {
        self.run_from(None, page_size).await
    }

    /// Rebuild starting at `cursor`, as returned by an interrupted run.
    ///
    /// Resuming repeats nothing destructive: every record lands via upsert,
    /// so re-running a page only rewrites identical vectors.
    pub async fn run_from(
        &self,
        cursor: Option<PageCursor>,
        page_size: usize,
    ) -> Result<ReindexSummary> {
        // A fresh run clears any cancellation left over from a prior one.
        self.cancelled.store(false, Ordering::Relaxed);

        let mut summary = ReindexSummary { indexed: 0, failed: 0, pages: 0, next_cursor: cursor };
        let mut cursor = cursor;

        loop {
            let page = self.store.list_page(cursor, page_size).await?;
            self.index_page(&page.records, &mut summary).await;
            summary.pages += 1;
            summary.next_cursor = page.next_cursor;
            cursor = page.next_cursor;

            if cursor.is_none() {
                break;
            }
            if self.cancelled.load(Ordering::Relaxed) {
                info!(
                    pages = summary.pages,
                    indexed = summary.indexed,
                    "reindex cancelled at page boundary"
                );
                return Ok(summary);
            }
        }

        info!(
            pages = summary.pages,
            indexed = summary.indexed,
            failed = summary.failed,
            "reindex complete"
        );
        Ok(summary)
    }

    /// Encode one page in document mode and upsert every record.
    async fn index_page(&self, records: &[TaskRecord], summary: &mut ReindexSummary) {
        if records.is_empty() {
            return;
        }

        let contents: Vec<String> = records.iter().map(indexable_content).collect();
        let texts: Vec<&str> = contents.iter().map(String::as_str).collect();

        let embeddings = match self.encoder.encode_batch(&texts, ContentMode::Document).await {
            Ok(embeddings) => embeddings,
            Err(e) => {
                warn!(error = %e, count = records.len(), "failed to encode page, skipping");
                summary.failed += records.len();
                return;
            }
        };

        for (record, embedding) in records.iter().zip(embeddings) {
            match self.index.upsert(record.id, embedding).await {
                Ok(()) => summary.indexed += 1,
                Err(e) => {
                    warn!(id = %record.id, error = %e, "failed to upsert during reindex");
                    summary.failed += 1;
                }
            }
        }
    }
}
