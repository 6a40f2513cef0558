use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A key paired with its touch count.
///
/// Ordered by score ascending, ties broken by key ascending, so the lowest
/// element of a sorted set is always the first one to evict. Identity inside a
/// [`BoundedRanking`](super::BoundedRanking) is decided by key alone; the
/// ranking keeps a key index for that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoredKey<K> {
    pub key: K,
    pub score: u64,
}

impl<K> ScoredKey<K> {
    pub fn new(key: K, score: u64) -> Self {
        Self { key, score }
    }
}

impl<K: PartialEq> ScoredKey<K> {
    pub fn same_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Ord> Ord for ScoredKey<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl<K: Ord> PartialOrd for ScoredKey<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: fmt::Display> fmt::Display for ScoredKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[key={}, touchCount={}]", self.key, self.score)
    }
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
