use crate::membership::service::{MembershipDirectory, MembershipService};
use crate::membership::types::MemberId;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub const DEFAULT_PARTITIONS: u32 = 256;

/// Hashes an internal key onto `num_partitions` buckets.
pub fn partition_of(key: &str, num_partitions: u32) -> u32 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let hash = hasher.finish() as u32;
    hash % num_partitions
}

/// Assigns partitions to storage members.
///
/// The owner of a partition is `storage_members[partition % len]` with members
/// sorted by id. There is no rebalancing: when membership changes, existing
/// entries stay where they were written.
pub struct PartitionManager {
    pub num_partitions: u32,
    membership: Arc<MembershipService>,
}

impl PartitionManager {
    pub fn new(membership: Arc<MembershipService>) -> Arc<Self> {
        Arc::new(Self {
            num_partitions: DEFAULT_PARTITIONS,
            membership,
        })
    }

    pub fn get_partition(&self, key: &str) -> u32 {
        partition_of(key, self.num_partitions)
    }

    /// Storage member ids in ownership order. Take one snapshot for bulk routing.
    pub fn owner_table(&self) -> Vec<MemberId> {
        self.membership
            .storage_members()
            .into_iter()
            .map(|member| member.id)
            .collect()
    }

    pub fn get_owner(&self, partition: u32) -> Option<MemberId> {
        owner_in(&self.owner_table(), partition)
    }

    pub fn owned_partitions(&self, member: &MemberId) -> Vec<u32> {
        let owners = self.owner_table();
        (0..self.num_partitions)
            .filter(|&partition| owner_in(&owners, partition).as_ref() == Some(member))
            .collect()
    }
}

pub(crate) fn owner_in(owners: &[MemberId], partition: u32) -> Option<MemberId> {
    if owners.is_empty() {
        return None;
    }
    Some(owners[(partition as usize) % owners.len()].clone())
}
