use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use crate::config::HotKeysConfig;
use crate::coordinator::HotKeysCoordinator;
use crate::invocation::LocalInvocationService;
use crate::membership::service::MembershipService;
use crate::membership::types::{ClusterMember, MemberId};
use crate::storage::cache::DistributedCache;
use crate::storage::codec::StringKeyCodec;
use crate::storage::memory::{LocalStore, StoreRegistry};
use crate::storage::partitioner::PartitionManager;

const BASE_PORT: u16 = 9000;

pub struct LocalCluster {
    config: HotKeysConfig,
    pub membership: Arc<MembershipService>,
    pub partitioner: Arc<PartitionManager>,
    pub stores: Arc<StoreRegistry>,
    next_port: AtomicU16,
}

impl LocalCluster {
    /// Starts a coordinator member plus `storage_members` storage members.
    pub fn start(config: &HotKeysConfig, storage_members: usize) -> Self {
        let coordinator = ClusterMember::client("coordinator", loopback(BASE_PORT));
        let membership = MembershipService::new(config.cache_service_name.clone(), coordinator);
        let partitioner = PartitionManager::new(membership.clone());

        let cluster = Self {
            config: config.clone(),
            membership,
            partitioner,
            stores: Arc::new(StoreRegistry::new()),
            next_port: AtomicU16::new(BASE_PORT + 1),
        };
        for _ in 0..storage_members {
            cluster.add_storage_member();
        }

        tracing::info!(
            "Local cluster started with {} storage members",
            cluster.storage_member_count()
        );
        cluster
    }

    /// Joins a new storage member with an empty store.
    pub fn add_storage_member(&self) -> ClusterMember {
        let port = self.next_port.fetch_add(1, Ordering::Relaxed);
        let member = ClusterMember::storage(format!("storage-{}", port - BASE_PORT), loopback(port));
        let store = LocalStore::new(member.id.clone(), self.config.cache_service_name.clone());
        store.ensure_cache(&self.config.cache_name);

        self.stores.insert(member.id.clone(), store);
        self.membership.join(member.clone());
        member
    }

    /// Takes a member out of the cluster. Tasks still running on it report as departed.
    pub fn remove_member(&self, id: &MemberId) -> bool {
        let left = self.membership.leave(id);
        self.stores.remove(id);
        left
    }

    pub fn storage_member_count(&self) -> usize {
        self.stores.len()
    }

    pub fn store(&self, id: &MemberId) -> Option<Arc<LocalStore>> {
        self.stores.get(id).map(|entry| entry.value().clone())
    }

    /// Typed client for the configured cache.
    pub fn cache<K, V>(&self) -> DistributedCache<K, V> {
        self.named_cache(&self.config.cache_name)
    }

    pub fn named_cache<K, V>(&self, name: &str) -> DistributedCache<K, V> {
        DistributedCache::new(name, self.partitioner.clone(), self.stores.clone())
    }

    pub fn invocation_service(&self) -> LocalInvocationService<StringKeyCodec> {
        LocalInvocationService::new(
            self.config.invocation_service_name.clone(),
            self.membership.clone(),
            self.stores.clone(),
        )
    }

    /// Coordinator wired to this cluster's directory and local invocation service.
    pub fn coordinator<K>(&self) -> HotKeysCoordinator<K>
    where
        K: ToString + std::str::FromStr + Ord + Clone + Send + 'static,
        <K as std::str::FromStr>::Err: std::fmt::Display,
    {
        HotKeysCoordinator::new(self.membership.clone(), Arc::new(self.invocation_service()))
    }
}

fn loopback(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}
