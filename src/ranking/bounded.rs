use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

use super::types::{ScoredKey, now_ms};

/// Sorted set of [`ScoredKey`]s with a fixed capacity.
///
/// Once full, a new item only gets in by beating the current minimum, which is
/// then evicted. Keys are unique: inserting a key that is already present
/// leaves the stored score untouched, even when the new score is higher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    from = "RankingSnapshot<K>",
    into = "RankingSnapshot<K>",
    bound(
        serialize = "K: Ord + Clone + Serialize",
        deserialize = "K: Ord + Clone + DeserializeOwned"
    )
)]
pub struct BoundedRanking<K> {
    capacity: usize,
    items: BTreeSet<ScoredKey<K>>,
    /// Key -> retained score. Mirrors `items` one to one.
    scores: BTreeMap<K, u64>,
    /// Timestamp (ms) of the first insert since the ranking was last empty.
    created_at: u64,
    /// Timestamp (ms) of the most recent insert call, kept or not.
    last_touched_at: u64,
}

impl<K: Ord + Clone> BoundedRanking<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: BTreeSet::new(),
            scores: BTreeMap::new(),
            created_at: 0,
            last_touched_at: 0,
        }
    }

    /// Offers an item to the ranking. Returns `true` if it was retained.
    ///
    /// O(log C). The touch timestamp moves on every call, including calls
    /// whose item is discarded.
    pub fn insert(&mut self, item: ScoredKey<K>) -> bool {
        let now = now_ms();
        if self.items.is_empty() {
            self.created_at = now;
        }

        let kept = self.admit(item);
        self.last_touched_at = now;
        kept
    }

    fn admit(&mut self, item: ScoredKey<K>) -> bool {
        if self.scores.contains_key(&item.key) {
            return false;
        }

        if self.items.len() < self.capacity {
            self.scores.insert(item.key.clone(), item.score);
            self.items.insert(item);
            return true;
        }

        match self.items.first() {
            Some(min) if item > *min => {
                if let Some(evicted) = self.items.pop_first() {
                    self.scores.remove(&evicted.key);
                }
                self.scores.insert(item.key.clone(), item.score);
                self.items.insert(item);
                true
            }
            _ => false,
        }
    }

    /// Folds every item of `other` into this ranking, least important first.
    ///
    /// Needs `&mut self`, so a single owner merges without locking. Use
    /// [`SharedRanking`] when several callers merge into one target.
    pub fn merge_from(&mut self, other: &BoundedRanking<K>) {
        for item in other.items.iter() {
            self.insert(item.clone());
        }
    }

    /// Items from highest to lowest score. Read-only.
    pub fn to_descending(&self) -> Vec<ScoredKey<K>> {
        self.items.iter().rev().cloned().collect()
    }

    /// Items in natural (ascending) order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ScoredKey<K>> {
        self.items.iter()
    }

    pub fn score_of(&self, key: &K) -> Option<u64> {
        self.scores.get(key).copied()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.scores.contains_key(key)
    }
}

impl<K> BoundedRanking<K> {
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Time between the first and the most recent insert. Zero before any insert.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.last_touched_at.saturating_sub(self.created_at))
    }
}

impl<K: fmt::Display> fmt::Display for BoundedRanking<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundedRanking [items=[")?;
        for (idx, item) in self.items.iter().rev().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "], capacity={}]", self.capacity)
    }
}

/// Wire form of a ranking. The key index is rebuilt on the way in.
#[derive(Serialize, Deserialize)]
struct RankingSnapshot<K> {
    capacity: usize,
    items: Vec<ScoredKey<K>>,
    created_at: u64,
    last_touched_at: u64,
}

impl<K> From<BoundedRanking<K>> for RankingSnapshot<K> {
    fn from(ranking: BoundedRanking<K>) -> Self {
        Self {
            capacity: ranking.capacity,
            items: ranking.items.into_iter().collect(),
            created_at: ranking.created_at,
            last_touched_at: ranking.last_touched_at,
        }
    }
}

impl<K: Ord + Clone> From<RankingSnapshot<K>> for BoundedRanking<K> {
    fn from(snapshot: RankingSnapshot<K>) -> Self {
        let mut ranking = BoundedRanking::new(snapshot.capacity);
        for item in snapshot.items {
            ranking.admit(item);
        }
        ranking.created_at = snapshot.created_at;
        ranking.last_touched_at = snapshot.last_touched_at;
        ranking
    }
}

/// A [`BoundedRanking`] that several callers may merge into concurrently.
///
/// The lock is held for a whole `merge_from` call, so each merge lands as one
/// unit and never interleaves with another merge's inserts.
#[derive(Debug)]
pub struct SharedRanking<K> {
    inner: Mutex<BoundedRanking<K>>,
}

impl<K: Ord + Clone> SharedRanking<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(BoundedRanking::new(capacity)),
        }
    }

    pub fn merge_from(&self, other: &BoundedRanking<K>) {
        let mut target = self.inner.lock();
        target.merge_from(other);
    }

    pub fn into_inner(self) -> BoundedRanking<K> {
        self.inner.into_inner()
    }
}
