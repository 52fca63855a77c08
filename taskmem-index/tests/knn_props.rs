//! Property tests for vector index ordering and threshold behavior.

use proptest::prelude::*;
use taskmem_core::RecordId;
use taskmem_index::VectorIndex;

const DIM: usize = 16;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate (id, embedding) entries with distinct ids.
fn arb_entries(dim: usize) -> impl Strategy<Value = Vec<(RecordId, Vec<f32>)>> {
    proptest::collection::btree_map(0i64..1000, arb_normalized_embedding(dim), 1..20)
        .prop_map(|m| m.into_iter().map(|(id, v)| (RecordId(id), v)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn results_ordered_ascending_and_bounded_by_k(
        entries in arb_entries(DIM),
        query in arb_normalized_embedding(DIM),
        k in 1usize..25,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (hits, stored) = rt.block_on(async {
            let index = VectorIndex::new(DIM);
            for (id, v) in &entries {
                index.upsert(*id, v.clone()).await.unwrap();
            }
            let hits = index.knn(&query, k, None).await.unwrap();
            (hits, entries.len())
        });

        prop_assert!(hits.len() <= k);
        prop_assert!(hits.len() <= stored);

        // Ascending by distance, ties ascending by id
        for window in hits.windows(2) {
            prop_assert!(
                window[0].distance < window[1].distance
                    || (window[0].distance == window[1].distance
                        && window[0].id < window[1].id),
                "results out of order: ({:?}, {}) before ({:?}, {})",
                window[0].id,
                window[0].distance,
                window[1].id,
                window[1].distance,
            );
        }

        // Distances are non-negative (cosine distance over R^n is within [0, 2])
        for hit in &hits {
            prop_assert!(hit.distance >= -1e-6 && hit.distance <= 2.0 + 1e-6);
        }
    }

    #[test]
    fn raising_max_distance_never_shrinks_results(
        entries in arb_entries(DIM),
        query in arb_normalized_embedding(DIM),
        low in 0.0f32..1.0,
        delta in 0.0f32..1.0,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (narrow, wide) = rt.block_on(async {
            let index = VectorIndex::new(DIM);
            for (id, v) in &entries {
                index.upsert(*id, v.clone()).await.unwrap();
            }
            let narrow = index.knn(&query, entries.len(), Some(low)).await.unwrap();
            let wide = index.knn(&query, entries.len(), Some(low + delta)).await.unwrap();
            (narrow, wide)
        });

        prop_assert!(
            wide.len() >= narrow.len(),
            "raising the cutoff from {} to {} shrank results: {} -> {}",
            low,
            low + delta,
            narrow.len(),
            wide.len(),
        );
    }

    #[test]
    fn self_query_is_top_hit_with_zero_distance(
        entries in arb_entries(DIM),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (probe_id, hits) = rt.block_on(async {
            let index = VectorIndex::new(DIM);
            for (id, v) in &entries {
                index.upsert(*id, v.clone()).await.unwrap();
            }
            let (probe_id, probe) = entries[0].clone();
            let hits = index.knn(&probe, entries.len(), None).await.unwrap();
            (probe_id, hits)
        });

        let top = &hits[0];
        prop_assert!(top.distance < 1e-5, "top distance {} not ~0", top.distance);
        // The probe's own entry is the top hit or tied with it
        let probe_hit = hits.iter().find(|h| h.id == probe_id).unwrap();
        prop_assert!((probe_hit.distance - top.distance).abs() < 1e-5);
    }

    #[test]
    fn deleted_id_never_appears_in_results(
        entries in arb_entries(DIM),
        query in arb_normalized_embedding(DIM),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (victim, hits) = rt.block_on(async {
            let index = VectorIndex::new(DIM);
            for (id, v) in &entries {
                index.upsert(*id, v.clone()).await.unwrap();
            }
            let victim = entries[0].0;
            index.delete(victim).await;
            let hits = index.knn(&query, entries.len(), None).await.unwrap();
            (victim, hits)
        });

        prop_assert!(hits.iter().all(|h| h.id != victim));
    }
}
