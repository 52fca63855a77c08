//! The memory service: dedup checking, recall, and episodic memory.
//!
//! All three operations share one mechanism — encode the caller's text in
//! query mode, run an exact nearest-neighbor scan under a distance cutoff,
//! and resolve the surviving ids back to records — differing only in which
//! threshold applies and whether a status predicate filters the hits.

use std::sync::Arc;

use serde::Serialize;
use taskmem_core::{RecordId, RecordStatus, RecordStore};
use taskmem_embed::{ContentMode, Encoder};
use taskmem_index::{IndexError, VectorIndex};
use tracing::{info, warn};

use crate::config::MemoryConfig;
use crate::error::{MemoryError, Result};

/// A resolved search hit returned to callers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchItem {
    /// Id of the matched record.
    pub id: RecordId,
    /// Cosine distance from the query; smaller is more similar.
    pub distance: f32,
    /// Title of the matched record.
    pub title: String,
    /// Current status of the matched record.
    pub status: RecordStatus,
}

/// Result of a memory operation.
///
/// When the encoder is unavailable the subsystem degrades rather than
/// failing the caller: `matches` is empty and `warning` explains why.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecallResponse {
    /// Ranked matches, ascending by distance.
    pub matches: Vec<MatchItem>,
    /// Degradation signal, set when semantic search could not run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl RecallResponse {
    fn degraded(warning: String) -> Self {
        Self { matches: Vec::new(), warning: Some(warning) }
    }
}

/// Public operations over encoder + index + record store.
///
/// The encoder is injected as `Arc<dyn Encoder>` so tests substitute a
/// deterministic fake; the fastembed singleton stays an implementation
/// detail of the production encoder.
pub struct MemoryService {
    config: MemoryConfig,
    encoder: Arc<dyn Encoder>,
    index: Arc<VectorIndex>,
    store: Arc<dyn RecordStore>,
}

impl MemoryService {
    /// Create a service over the given collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Config`] if the encoder, the index, and the
    /// configuration disagree on vector dimensionality — catching the
    /// mismatch here turns a per-query failure into a constructor-time one.
    pub fn new(
        config: MemoryConfig,
        encoder: Arc<dyn Encoder>,
        index: Arc<VectorIndex>,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self> {
        if encoder.dimensions() != config.dimensions {
            return Err(MemoryError::Config(format!(
                "encoder produces {}-dimensional vectors, config expects {}",
                encoder.dimensions(),
                config.dimensions
            )));
        }
        if index.dimensions() != config.dimensions {
            return Err(MemoryError::Config(format!(
                "index holds {}-dimensional vectors, config expects {}",
                index.dimensions(),
                config.dimensions
            )));
        }
        Ok(Self { config, encoder, index, store })
    }

    /// Return a reference to the service configuration.
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Check for existing records covering the same work (the dedup gate).
    ///
    /// Encodes `text` in query mode and searches under the strict threshold.
    /// If the top match's distance is below that threshold, the caller should
    /// update or reference the existing record instead of creating a new one.
    pub async fn check_prior_work(
        &self,
        text: &str,
        limit: Option<usize>,
    ) -> Result<RecallResponse> {
        self.query(text, limit, self.config.strict_threshold, None).await
    }

    /// Exploratory recall of related records under the loose threshold.
    ///
    /// No status filtering: pending and in-flight work is as relevant to
    /// exploration as finished work.
    pub async fn recall(&self, text: &str, limit: Option<usize>) -> Result<RecallResponse> {
        self.query(text, limit, self.config.loose_threshold, None).await
    }

    /// Recall resolutions from terminal-resolved records (episodic memory).
    ///
    /// Same mechanism as [`recall`](Self::recall), restricted to records
    /// whose status is in the configured terminal set.
    pub async fn consult_episodic_memory(
        &self,
        text: &str,
        limit: Option<usize>,
    ) -> Result<RecallResponse> {
        self.query(text, limit, self.config.loose_threshold, Some(&self.config.terminal_statuses))
            .await
    }

    /// Shared query path: encode → knn → resolve → filter → rank.
    async fn query(
        &self,
        text: &str,
        limit: Option<usize>,
        max_distance: f32,
        status_filter: Option<&[RecordStatus]>,
    ) -> Result<RecallResponse> {
        let limit = limit.unwrap_or(self.config.default_limit);

        let query_embedding = match self.encoder.encode(text, ContentMode::Query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "encoder unavailable, semantic search degraded");
                return Ok(RecallResponse::degraded(format!("semantic search unavailable: {e}")));
            }
        };

        // Status filtering happens after resolution and can only shrink the
        // hit set, so over-fetch from the index before filtering.
        let fetch = if status_filter.is_some() { (limit * 4).max(16) } else { limit };

        let hits = match self.index.knn(&query_embedding, fetch, Some(max_distance)).await {
            Ok(hits) => hits,
            Err(e @ IndexError::Corruption { .. }) => {
                warn!(error = %e, "vector index corrupt, semantic search degraded until reindex");
                return Ok(RecallResponse::degraded(format!(
                    "semantic search unavailable: {e}; run a full reindex"
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let mut matches = Vec::with_capacity(hits.len().min(limit));
        for hit in hits {
            let Some(record) = self.store.get_by_id(hit.id).await? else {
                // Stale entry: the index outlived its record. Drop the hit
                // rather than failing the query; reindex reconciles.
                warn!(id = %hit.id, "indexed id has no record, dropping stale hit");
                continue;
            };
            if let Some(statuses) = status_filter {
                if !statuses.contains(&record.status) {
                    continue;
                }
            }
            matches.push(MatchItem {
                id: record.id,
                distance: hit.distance,
                title: record.title,
                status: record.status,
            });
            if matches.len() == limit {
                break;
            }
        }

        info!(
            query_len = text.len(),
            max_distance,
            match_count = matches.len(),
            "memory query completed"
        );
        Ok(RecallResponse { matches, warning: None })
    }
}
