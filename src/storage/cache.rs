use anyhow::{Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

use super::codec::{KeyCodec, StringKeyCodec};
use super::memory::{LocalStore, StoreRegistry};
use super::partitioner::{PartitionManager, owner_in};
use crate::membership::types::MemberId;

/// Typed client over the stores of an in-process cluster.
///
/// Every key is routed to the storage member that owns its partition. Values
/// are kept as JSON, keys in their codec-encoded form.
pub struct DistributedCache<K, V, C = StringKeyCodec> {
    name: String,
    partitioner: Arc<PartitionManager>,
    stores: Arc<StoreRegistry>,
    codec: C,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> DistributedCache<K, V, StringKeyCodec> {
    pub fn new(
        name: impl Into<String>,
        partitioner: Arc<PartitionManager>,
        stores: Arc<StoreRegistry>,
    ) -> Self {
        Self::with_codec(name, partitioner, stores, StringKeyCodec)
    }
}

impl<K, V, C> DistributedCache<K, V, C> {
    pub fn with_codec(
        name: impl Into<String>,
        partitioner: Arc<PartitionManager>,
        stores: Arc<StoreRegistry>,
        codec: C,
    ) -> Self {
        Self {
            name: name.into(),
            partitioner,
            stores,
            codec,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Removes every entry of this cache on every hosted store.
    pub fn clear(&self) {
        for store in self.stores.iter() {
            if let Some(cache) = store.value().cache(&self.name) {
                cache.clear();
            }
        }
    }

    /// Number of entries across all hosted stores.
    pub fn size(&self) -> usize {
        self.stores
            .iter()
            .filter_map(|store| store.value().cache(&self.name))
            .map(|cache| cache.entry_count())
            .sum()
    }

    fn store_for(&self, owner: &MemberId) -> Result<Arc<LocalStore>> {
        self.stores
            .get(owner)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| anyhow!("Owner member {} hosts no store", owner))
    }
}

impl<K, V, C> DistributedCache<K, V, C>
where
    C: KeyCodec<K>,
    V: Serialize + DeserializeOwned,
{
    pub fn put(&self, key: &K, value: &V) -> Result<()> {
        let owners = self.partitioner.owner_table();
        self.put_routed(&owners, key, value)
    }

    /// Writes a batch against a single ownership snapshot. Returns the number written.
    pub fn put_all<I>(&self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let owners = self.partitioner.owner_table();
        let mut written = 0;
        for (key, value) in entries {
            self.put_routed(&owners, &key, &value)?;
            written += 1;
        }
        tracing::debug!("Stored {} entries in cache {}", written, self.name);
        Ok(written)
    }

    fn put_routed(&self, owners: &[MemberId], key: &K, value: &V) -> Result<()> {
        let raw_key = self.codec.encode(key);
        let partition = self.partitioner.get_partition(&raw_key);
        let owner = owner_in(owners, partition)
            .ok_or_else(|| anyhow!("No storage members own partition {}", partition))?;

        let value_json = serde_json::to_string(value)?;
        self.store_for(&owner)?
            .ensure_cache(&self.name)
            .store(partition, raw_key, value_json);
        Ok(())
    }

    /// Reads a value from its owner, counting the access.
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        let raw_key = self.codec.encode(key);
        let partition = self.partitioner.get_partition(&raw_key);
        let Some(owner) = self.partitioner.get_owner(partition) else {
            tracing::warn!("GET: No storage members to read from");
            return Ok(None);
        };

        let Some(cache) = self.store_for(&owner)?.cache(&self.name) else {
            return Ok(None);
        };
        match cache.get(partition, &raw_key) {
            Some(value_json) => Ok(Some(serde_json::from_str(&value_json)?)),
            None => Ok(None),
        }
    }

    /// Current touch count of a key on its owner, without counting a read.
    pub fn touch_count(&self, key: &K) -> Option<u64> {
        let raw_key = self.codec.encode(key);
        let partition = self.partitioner.get_partition(&raw_key);
        let owner = self.partitioner.get_owner(partition)?;
        let store = self.store_for(&owner).ok()?;
        store.cache(&self.name)?.touch_count(partition, &raw_key)
    }
}
