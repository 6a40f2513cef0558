use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::membership::types::MemberId;

/// Stores hosted in this process, keyed by the member that owns them.
pub type StoreRegistry = DashMap<MemberId, Arc<LocalStore>>;

/// A stored value and its access counter.
#[derive(Debug)]
pub struct StoredEntry {
    value_json: String,
    touches: AtomicU64,
}

impl StoredEntry {
    fn new(value_json: String) -> Self {
        Self {
            value_json,
            touches: AtomicU64::new(0),
        }
    }

    pub fn touch_count(&self) -> u64 {
        self.touches.load(Ordering::Relaxed)
    }
}

/// One named cache on one member.
///
/// Structure: `Partition ID -> internal key -> StoredEntry`.
#[derive(Debug)]
pub struct NamedCache {
    name: String,
    partitions: DashMap<u32, DashMap<String, StoredEntry>>,
}

impl NamedCache {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            partitions: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts or overwrites a value. An overwrite keeps the entry's touch count.
    pub fn store(&self, partition: u32, key: String, value_json: String) {
        let partition_map = self.partitions.entry(partition).or_default();
        match partition_map.entry(key) {
            Entry::Occupied(mut existing) => existing.get_mut().value_json = value_json,
            Entry::Vacant(slot) => {
                slot.insert(StoredEntry::new(value_json));
            }
        }
    }

    /// Reads a value and counts the access.
    pub fn get(&self, partition: u32, key: &str) -> Option<String> {
        let partition_map = self.partitions.get(&partition)?;
        let entry = partition_map.get(key)?;
        entry.touches.fetch_add(1, Ordering::Relaxed);
        Some(entry.value_json.clone())
    }

    /// Reads a value without counting the access.
    pub fn peek(&self, partition: u32, key: &str) -> Option<String> {
        let partition_map = self.partitions.get(&partition)?;
        let entry = partition_map.get(key)?;
        Some(entry.value_json.clone())
    }

    pub fn touch_count(&self, partition: u32, key: &str) -> Option<u64> {
        let partition_map = self.partitions.get(&partition)?;
        let entry = partition_map.get(key)?;
        Some(entry.touch_count())
    }

    /// Visits every entry with its current touch count.
    ///
    /// Counts are read one entry at a time, so concurrent reads may or may not
    /// be reflected. Stops at the first error.
    pub fn try_scan<E>(&self, mut visit: impl FnMut(&str, u64) -> Result<(), E>) -> Result<(), E> {
        for partition_map in self.partitions.iter() {
            for entry in partition_map.value().iter() {
                visit(entry.key(), entry.value().touch_count())?;
            }
        }
        Ok(())
    }

    pub fn entry_count(&self) -> usize {
        self.partitions
            .iter()
            .map(|entry| entry.value().len())
            .sum()
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn clear(&self) {
        self.partitions.clear();
    }
}

/// All caches a member holds for one cache service.
#[derive(Debug)]
pub struct LocalStore {
    member_id: MemberId,
    service_name: String,
    caches: DashMap<String, Arc<NamedCache>>,
}

impl LocalStore {
    pub fn new(member_id: MemberId, service_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            member_id,
            service_name: service_name.into(),
            caches: DashMap::new(),
        })
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the named cache, creating it on first use.
    pub fn ensure_cache(&self, name: &str) -> Arc<NamedCache> {
        self.caches
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(NamedCache::new(name)))
            .clone()
    }

    pub fn cache(&self, name: &str) -> Option<Arc<NamedCache>> {
        self.caches.get(name).map(|entry| entry.value().clone())
    }

    pub fn local_entry_count(&self) -> usize {
        self.caches
            .iter()
            .map(|entry| entry.value().entry_count())
            .sum()
    }
}
