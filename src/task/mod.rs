//! Node Task Module
//!
//! The unit of work a storage member runs against its own partitions: scan every
//! locally owned entry of one cache, score it by touch count and keep the `top_n`
//! hottest in a fresh `BoundedRanking`. The scan only reads; it never mutates the
//! store.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::HotKeysConfig;
use crate::error::TaskError;
use crate::ranking::{BoundedRanking, ScoredKey};
use crate::storage::codec::KeyCodec;
use crate::storage::memory::LocalStore;


/// Parameters shipped to each storage member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HotKeyTask {
    pub cache_name: String,
    pub cache_service_name: String,
    pub top_n: usize,
}

impl HotKeyTask {
    pub fn new(cache_name: impl Into<String>, cache_service_name: impl Into<String>, top_n: usize) -> Self {
        Self {
            cache_name: cache_name.into(),
            cache_service_name: cache_service_name.into(),
            top_n,
        }
    }

    pub fn from_config(config: &HotKeysConfig) -> Self {
        Self::new(
            config.cache_name.clone(),
            config.cache_service_name.clone(),
            config.top_n,
        )
    }

    /// Ranks the member's local entries of the task's cache.
    pub fn run<K, C>(&self, store: &LocalStore, codec: &C) -> Result<BoundedRanking<K>, TaskError>
    where
        K: Ord + Clone,
        C: KeyCodec<K> + ?Sized,
    {
        if store.service_name() != self.cache_service_name {
            return Err(TaskError::ServiceMismatch {
                requested: self.cache_service_name.clone(),
                actual: store.service_name().to_string(),
            });
        }

        let cache = store
            .cache(&self.cache_name)
            .ok_or_else(|| TaskError::UnknownCache(self.cache_name.clone()))?;

        debug!(
            "There are {} entries in the {} cache on local member {}",
            cache.entry_count(),
            self.cache_name,
            store.member_id()
        );

        let mut results = BoundedRanking::new(self.top_n);
        cache.try_scan(|raw_key, touches| {
            let key = codec.decode(raw_key)?;
            results.insert(ScoredKey::new(key, touches));
            tracing::trace!("key={}, touchCount={}", raw_key, touches);
            Ok::<(), TaskError>(())
        })?;

        debug!(
            "Member {} ranked {} hot keys in {:?}",
            store.member_id(),
            results.len(),
            results.elapsed()
        );

        Ok(results)
    }
}
