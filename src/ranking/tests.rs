//! Ranking Module Tests
//!
//! ## Test Scopes
//! - **Ordering**: score first, key as tie-breaker.
//! - **Bounding**: the retained set always equals the top-C of everything offered.
//! - **Duplicates**: key identity wins over score (the first score sticks).
//! - **Merging**: result is independent of merge order and matches a direct fold.

#[cfg(test)]
mod tests {
    use crate::ranking::{BoundedRanking, ScoredKey, SharedRanking};
    use rand::Rng;
    use rand::seq::SliceRandom;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn sk(key: &str, score: u64) -> ScoredKey<String> {
        ScoredKey::new(key.to_string(), score)
    }

    fn ranking_of(capacity: usize, items: &[(&str, u64)]) -> BoundedRanking<String> {
        let mut ranking = BoundedRanking::new(capacity);
        for (key, score) in items {
            ranking.insert(sk(key, *score));
        }
        ranking
    }

    /// Reference model: dedupe by key (first score wins), full sort, take the top C.
    fn reference_top(items: &[(u32, u64)], capacity: usize) -> Vec<ScoredKey<u32>> {
        let mut first_seen: BTreeMap<u32, u64> = BTreeMap::new();
        for (key, score) in items {
            first_seen.entry(*key).or_insert(*score);
        }
        let mut all: Vec<ScoredKey<u32>> = first_seen
            .into_iter()
            .map(|(key, score)| ScoredKey::new(key, score))
            .collect();
        all.sort();
        all.reverse();
        all.truncate(capacity);
        all
    }

    // ============================================================
    // ORDERING
    // ============================================================

    #[test]
    fn test_scored_key_orders_by_score_then_key() {
        assert!(sk("a", 1) < sk("a", 2));
        assert!(sk("z", 1) < sk("a", 2));
        assert!(sk("a", 5) < sk("b", 5));
        assert!(sk("a", 5).same_key(&sk("a", 9)));
    }

    // ============================================================
    // BOUNDING
    // ============================================================

    #[test]
    fn test_insert_keeps_top_c_against_full_sort() {
        let mut rng = rand::thread_rng();

        for capacity in [0usize, 1, 3, 10, 50] {
            // Distinct keys so the reference model and the ranking see the same population.
            let mut keys: Vec<u32> = (0..200).collect();
            keys.shuffle(&mut rng);
            let items: Vec<(u32, u64)> = keys
                .into_iter()
                .map(|key| (key, rng.gen_range(0..40)))
                .collect();

            let mut ranking = BoundedRanking::new(capacity);
            for (key, score) in &items {
                ranking.insert(ScoredKey::new(*key, *score));
                assert!(ranking.len() <= capacity, "Size must never exceed capacity");
            }

            assert_eq!(ranking.to_descending(), reference_top(&items, capacity));
        }
    }

    #[test]
    fn test_full_ranking_discards_items_not_above_min() {
        let mut ranking = ranking_of(2, &[("a", 5), ("b", 7)]);

        // Same score, lower key: not greater than the min ("a", 5)
        assert!(!ranking.insert(sk("0", 5)));
        assert!(!ranking.insert(sk("c", 1)));

        // Same score, higher key: beats ("a", 5)
        assert!(ranking.insert(sk("b2", 5)));

        assert_eq!(ranking.to_descending(), vec![sk("b", 7), sk("b2", 5)]);
        assert!(!ranking.contains_key(&"a".to_string()));
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        let mut ranking = BoundedRanking::new(0);

        assert!(!ranking.insert(sk("a", 100)));
        assert!(ranking.is_empty());
        assert!(ranking.is_full());
        assert!(ranking.to_descending().is_empty());
    }

    // ============================================================
    // DUPLICATE KEYS
    // ============================================================

    #[test]
    fn test_duplicate_key_with_lower_score_is_noop() {
        let mut ranking = ranking_of(5, &[("a", 10)]);

        assert!(!ranking.insert(sk("a", 3)));

        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking.score_of(&"a".to_string()), Some(10));
    }

    #[test]
    fn test_duplicate_key_with_higher_score_keeps_first_score() {
        // Pinned behaviour: the first score for a key sticks, a later higher score is ignored.
        let mut ranking = ranking_of(5, &[("a", 10), ("b", 4)]);

        assert!(!ranking.insert(sk("a", 99)));

        assert_eq!(ranking.score_of(&"a".to_string()), Some(10));
        assert_eq!(ranking.to_descending(), vec![sk("a", 10), sk("b", 4)]);
    }

    #[test]
    fn test_duplicate_key_on_full_ranking_keeps_size() {
        let mut ranking = ranking_of(2, &[("a", 1), ("b", 2)]);

        ranking.insert(sk("a", 50));
        ranking.insert(sk("b", 0));

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking.to_descending(), vec![sk("b", 2), sk("a", 1)]);
    }

    #[test]
    fn test_evicted_key_can_come_back() {
        let mut ranking = ranking_of(1, &[("a", 1)]);

        assert!(ranking.insert(sk("b", 2)));
        assert!(!ranking.contains_key(&"a".to_string()));

        assert!(ranking.insert(sk("a", 3)));
        assert_eq!(ranking.to_descending(), vec![sk("a", 3)]);
    }

    // ============================================================
    // READS AND TIMERS
    // ============================================================

    #[test]
    fn test_to_descending_is_idempotent() {
        let ranking = ranking_of(4, &[("a", 3), ("b", 9), ("c", 1), ("d", 9)]);

        let first = ranking.to_descending();
        let second = ranking.to_descending();

        assert_eq!(first, second);
        assert_eq!(first, vec![sk("d", 9), sk("b", 9), sk("a", 3), sk("c", 1)]);
    }

    #[test]
    fn test_elapsed_is_zero_before_and_after_single_insert() {
        let mut ranking: BoundedRanking<String> = BoundedRanking::new(3);
        assert_eq!(ranking.elapsed().as_millis(), 0);

        ranking.insert(sk("a", 1));
        assert_eq!(ranking.elapsed().as_millis(), 0);
    }

    #[test]
    fn test_elapsed_grows_with_later_inserts() {
        let mut ranking = BoundedRanking::new(1);
        ranking.insert(sk("a", 5));

        std::thread::sleep(std::time::Duration::from_millis(15));
        // Discarded, but still moves the touch timestamp
        ranking.insert(sk("b", 1));

        assert!(ranking.elapsed().as_millis() >= 10);
        assert_eq!(ranking.len(), 1);
    }

    #[test]
    fn test_display_lists_high_to_low() {
        let ranking = ranking_of(3, &[("a", 1), ("b", 2)]);

        assert_eq!(
            ranking.to_string(),
            "BoundedRanking [items=[[key=b, touchCount=2], [key=a, touchCount=1]], capacity=3]"
        );
    }

    // ============================================================
    // MERGING
    // ============================================================

    #[test]
    fn test_merge_order_does_not_change_result() {
        let a = ranking_of(3, &[("k1", 10), ("k2", 8), ("k7", 3)]);
        let b = ranking_of(3, &[("k3", 9), ("k4", 5), ("k8", 8)]);
        let c = ranking_of(3, &[("k5", 20), ("k6", 1), ("k9", 10)]);

        let orders: [[&BoundedRanking<String>; 3]; 6] = [
            [&a, &b, &c],
            [&a, &c, &b],
            [&b, &a, &c],
            [&b, &c, &a],
            [&c, &a, &b],
            [&c, &b, &a],
        ];

        let mut union = BoundedRanking::new(4);
        for source in [&a, &b, &c] {
            for item in source.iter() {
                union.insert(item.clone());
            }
        }

        for order in orders {
            let mut target = BoundedRanking::new(4);
            for source in order {
                target.merge_from(source);
            }
            assert_eq!(target.to_descending(), union.to_descending());
        }

        assert_eq!(
            union.to_descending(),
            vec![sk("k5", 20), sk("k9", 10), sk("k1", 10), sk("k3", 9)]
        );
    }

    #[test]
    fn test_merge_of_random_rankings_is_associative() {
        let mut rng = rand::thread_rng();
        let sources: Vec<BoundedRanking<u32>> = (0..5)
            .map(|node| {
                let mut ranking = BoundedRanking::new(8);
                for i in 0..100u32 {
                    // Disjoint key ranges per node, like partition-local keys
                    ranking.insert(ScoredKey::new(node * 1000 + i, rng.gen_range(0..500)));
                }
                ranking
            })
            .collect();

        let mut left = BoundedRanking::new(8);
        for source in &sources {
            left.merge_from(source);
        }

        let mut partial = BoundedRanking::new(8);
        partial.merge_from(&sources[3]);
        partial.merge_from(&sources[4]);
        let mut right = BoundedRanking::new(8);
        right.merge_from(&sources[1]);
        right.merge_from(&partial);
        right.merge_from(&sources[0]);
        right.merge_from(&sources[2]);

        assert_eq!(left.to_descending(), right.to_descending());
    }

    #[test]
    fn test_shared_ranking_concurrent_merges() {
        let shared = Arc::new(SharedRanking::new(10));
        let mut handles = Vec::new();

        for node in 0..8u32 {
            let shared = shared.clone();
            handles.push(std::thread::spawn(move || {
                let mut local = BoundedRanking::new(10);
                for i in 0..50u32 {
                    local.insert(ScoredKey::new(node * 100 + i, u64::from(node * 100 + i)));
                }
                shared.merge_from(&local);
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let merged = Arc::try_unwrap(shared).unwrap().into_inner();
        let expected: Vec<u32> = (740..750).rev().collect();
        let got: Vec<u32> = merged.to_descending().into_iter().map(|item| item.key).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_deserialized_ranking_still_dedupes_by_key() {
        let ranking = ranking_of(3, &[("a", 4), ("b", 6)]);

        let json = serde_json::to_string(&ranking).unwrap();
        let mut restored: BoundedRanking<String> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.to_descending(), ranking.to_descending());
        assert!(!restored.insert(sk("a", 100)));
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.capacity(), 3);
    }
}
