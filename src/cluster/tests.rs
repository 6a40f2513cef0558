//! In-Process Cluster Tests

#[cfg(test)]
mod tests {
    use crate::cluster::{LocalCluster, WarmupPlan, warmup};
    use crate::config::HotKeysConfig;
    use crate::membership::service::MembershipDirectory;
    use crate::storage::cache::DistributedCache;

    #[test]
    fn test_start_joins_storage_members() {
        let cluster = LocalCluster::start(&HotKeysConfig::default(), 3);

        assert_eq!(cluster.storage_member_count(), 3);
        assert_eq!(cluster.membership.storage_members().len(), 3);
        // The coordinator member is alive but owns no storage
        assert_eq!(cluster.membership.alive_count(), 4);
    }

    #[test]
    fn test_remove_member_drops_it_from_directory() {
        let cluster = LocalCluster::start(&HotKeysConfig::default(), 2);
        let victim = cluster.membership.storage_members()[0].id.clone();

        assert!(cluster.remove_member(&victim));

        assert_eq!(cluster.membership.storage_members().len(), 1);
        assert!(cluster.store(&victim).is_none());
    }

    #[test]
    fn test_warmup_builds_skewed_access_pattern() {
        let cluster = LocalCluster::start(&HotKeysConfig::default(), 2);
        let cache: DistributedCache<u32, String> = cluster.cache();
        let plan = WarmupPlan::default().with_entries(500).with_random_gets(0);

        warmup(&cache, &plan).unwrap();

        assert_eq!(cache.size(), 500);
        assert_eq!(cache.touch_count(&50), Some(50));
        assert_eq!(cache.touch_count(&25), Some(25));
        assert_eq!(cache.touch_count(&10), Some(10));
        assert_eq!(cache.touch_count(&11), Some(0));
    }

    #[test]
    fn test_warmup_resets_previous_contents() {
        let cluster = LocalCluster::start(&HotKeysConfig::default(), 1);
        let cache: DistributedCache<u32, String> = cluster.cache();
        cache.put(&999_999, &"stale".to_string()).unwrap();

        warmup(&cache, &WarmupPlan::default().with_entries(100).with_random_gets(10)).unwrap();

        assert_eq!(cache.size(), 100);
        assert_eq!(cache.get(&999_999).unwrap(), None);
    }
}
