use anyhow::Result;
use rand::Rng;

use crate::storage::cache::DistributedCache;
use crate::storage::codec::KeyCodec;

/// Data set and access pattern used to warm a cache up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmupPlan {
    /// Keys `0..entries` are written, each with a "Price plan #i" value.
    pub entries: u32,
    /// Uniformly random reads across all keys.
    pub random_gets: usize,
    /// Fixed `(key, reads)` bursts applied after the random reads.
    pub bursts: Vec<(u32, usize)>,
}

impl WarmupPlan {
    pub fn with_entries(mut self, entries: u32) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_random_gets(mut self, random_gets: usize) -> Self {
        self.random_gets = random_gets;
        self
    }
}

impl Default for WarmupPlan {
    fn default() -> Self {
        Self {
            entries: 1_000_000,
            random_gets: 1_000,
            bursts: vec![(50, 50), (25, 25), (10, 10)],
        }
    }
}

/// Clears `cache`, fills it, then reads it according to `plan`.
pub fn warmup<C>(cache: &DistributedCache<u32, String, C>, plan: &WarmupPlan) -> Result<()>
where
    C: KeyCodec<u32>,
{
    tracing::info!(
        "Warming up cache {} with {} entries",
        cache.name(),
        plan.entries
    );

    cache.clear();
    cache.put_all((0..plan.entries).map(|i| (i, format!("Price plan #{}", i))))?;

    if plan.entries > 0 {
        let mut rng = rand::thread_rng();
        for _ in 0..plan.random_gets {
            let key = rng.gen_range(0..plan.entries);
            cache.get(&key)?;
        }
    }

    for (key, reads) in &plan.bursts {
        for _ in 0..*reads {
            cache.get(key)?;
        }
    }

    tracing::info!("Warm-up of cache {} done", cache.name());
    Ok(())
}
