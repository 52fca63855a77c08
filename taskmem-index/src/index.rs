//! Exact cosine-distance vector index.
//!
//! Distance is computed against every stored entry — a deliberate exact
//! linear scan rather than an approximate structure. At the expected scale
//! (tens of thousands of records) the scan is cheap, and the dedup and
//! recall guarantees depend on exact ranking: an approximate index would
//! introduce recall gaps that undermine trust in duplicate detection.

use std::collections::HashMap;

use taskmem_core::RecordId;
use tokio::sync::RwLock;
use tracing::trace;

use crate::error::{IndexError, Result};

/// One search hit: a record id and its distance from the query.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SimilarityResult {
    /// Id of the matched record.
    pub id: RecordId,
    /// Cosine distance from the query; non-negative, smaller is more similar.
    pub distance: f32,
}

/// Keyed storage of record-id → embedding with k-nearest-neighbor queries.
///
/// Holds at most one entry per record id (`upsert` overwrites). Writers take
/// the write lock so mutations are mutually exclusive; readers share the read
/// lock and always observe a consistent snapshot — a vector is either fully
/// present with its final value or absent.
///
/// # Example
///
/// ```rust,ignore
/// use taskmem_index::VectorIndex;
///
/// let index = VectorIndex::new(384);
/// index.upsert(id, embedding).await?;
/// let hits = index.knn(&query, 5, Some(0.2)).await?;
/// ```
#[derive(Debug)]
pub struct VectorIndex {
    dimensions: usize,
    entries: RwLock<HashMap<RecordId, Vec<f32>>>,
}

/// Cosine distance `1 − (a·b)/(‖a‖‖b‖)` given a precomputed norm for `a`.
///
/// A zero-magnitude vector on either side yields distance 1.0: no similarity
/// evidence, not an error.
fn cosine_distance(a: &[f32], a_norm: f32, b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let b_norm: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if a_norm == 0.0 || b_norm == 0.0 {
        return 1.0;
    }
    1.0 - dot / (a_norm * b_norm)
}

impl VectorIndex {
    /// Create an empty index holding `dimensions`-length vectors.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, entries: RwLock::new(HashMap::new()) }
    }

    /// The vector length this index accepts.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Insert or replace the entry for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DimensionMismatch`] if `embedding` is not
    /// exactly the index dimensionality; storage is left untouched.
    pub async fn upsert(&self, id: RecordId, embedding: Vec<f32>) -> Result<()> {
        if embedding.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }
        let mut entries = self.entries.write().await;
        entries.insert(id, embedding);
        trace!(%id, "upserted index entry");
        Ok(())
    }

    /// Remove the entry for `id`. No-op if absent.
    pub async fn delete(&self, id: RecordId) {
        let mut entries = self.entries.write().await;
        if entries.remove(&id).is_some() {
            trace!(%id, "deleted index entry");
        }
    }

    /// Return the `k` entries nearest to `query`, ascending by distance.
    ///
    /// Ties are broken by ascending record id so results are deterministic.
    /// When `max_distance` is given, only hits at or under it are returned.
    /// An empty index yields an empty result, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DimensionMismatch`] for a wrong-length query,
    /// or [`IndexError::Corruption`] if a stored entry's length no longer
    /// matches the index (dimension change without reindex).
    pub async fn knn(
        &self,
        query: &[f32],
        k: usize,
        max_distance: Option<f32>,
    ) -> Result<Vec<SimilarityResult>> {
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_norm: f32 = query.iter().map(|x| x * x).sum::<f32>().sqrt();
        let entries = self.entries.read().await;

        let mut scored = Vec::with_capacity(entries.len());
        for (&id, stored) in entries.iter() {
            if stored.len() != self.dimensions {
                return Err(IndexError::Corruption {
                    id,
                    expected: self.dimensions,
                    actual: stored.len(),
                });
            }
            let distance = cosine_distance(query, query_norm, stored);
            if max_distance.is_none_or(|max| distance <= max) {
                scored.push(SimilarityResult { id, distance });
            }
        }
        drop(entries);

        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        scored.truncate(k);
        Ok(scored)
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the index holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Snapshot of all stored record ids, unordered.
    pub async fn ids(&self) -> Vec<RecordId> {
        self.entries.read().await.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(x: f32, y: f32) -> Vec<f32> {
        let norm = (x * x + y * y).sqrt();
        vec![x / norm, y / norm]
    }

    #[tokio::test]
    async fn upsert_rejects_wrong_dimension() {
        let index = VectorIndex::new(3);
        let err = index.upsert(RecordId(1), vec![1.0, 0.0]).await.unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch { expected: 3, actual: 2 }
        ));
        assert!(index.is_empty().await);
    }

    #[tokio::test]
    async fn upsert_overwrites_previous_entry() {
        let index = VectorIndex::new(2);
        index.upsert(RecordId(1), unit(1.0, 0.0)).await.unwrap();
        index.upsert(RecordId(1), unit(0.0, 1.0)).await.unwrap();
        assert_eq!(index.len().await, 1);

        let hits = index.knn(&unit(0.0, 1.0), 1, None).await.unwrap();
        assert_eq!(hits[0].id, RecordId(1));
        assert!(hits[0].distance < 1e-5);
    }

    #[tokio::test]
    async fn knn_on_empty_index_returns_empty() {
        let index = VectorIndex::new(2);
        let hits = index.knn(&unit(1.0, 0.0), 5, None).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn knn_breaks_ties_by_ascending_id() {
        let index = VectorIndex::new(2);
        let v = unit(1.0, 0.0);
        index.upsert(RecordId(9), v.clone()).await.unwrap();
        index.upsert(RecordId(3), v.clone()).await.unwrap();
        index.upsert(RecordId(7), v.clone()).await.unwrap();

        let hits = index.knn(&v, 3, None).await.unwrap();
        let ids: Vec<_> = hits.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RecordId(3), RecordId(7), RecordId(9)]);
    }

    #[tokio::test]
    async fn max_distance_cutoff_is_inclusive() {
        let index = VectorIndex::new(2);
        index.upsert(RecordId(1), unit(1.0, 0.0)).await.unwrap();

        let hits = index.knn(&unit(0.0, 1.0), 5, Some(1.0)).await.unwrap();
        assert_eq!(hits.len(), 1);
        let hits = index.knn(&unit(0.0, 1.0), 5, Some(0.5)).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_entry_and_is_idempotent() {
        let index = VectorIndex::new(2);
        index.upsert(RecordId(1), unit(1.0, 0.0)).await.unwrap();
        index.delete(RecordId(1)).await;
        index.delete(RecordId(1)).await;

        let hits = index.knn(&unit(1.0, 0.0), 5, None).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn zero_magnitude_query_scores_distance_one() {
        let index = VectorIndex::new(2);
        index.upsert(RecordId(1), unit(1.0, 0.0)).await.unwrap();

        let hits = index.knn(&[0.0, 0.0], 1, None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 1.0).abs() < f32::EPSILON);
    }
}
