//! Fetch configuration.
//!
//! Mirrors the knobs of the command line: cache name, the cache service that
//! owns the storage members, the invocation service used for dispatch and the
//! number of hot keys to keep.

use serde::{Deserialize, Serialize};

use crate::error::HotKeysError;

pub const DEFAULT_TOP_N: usize = 100;
pub const DEFAULT_CACHE_NAME: &str = "default_cache";
pub const DEFAULT_CACHE_SERVICE_NAME: &str = "DistributedCache";
pub const DEFAULT_INVOCATION_SERVICE_NAME: &str = "InvocationService";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HotKeysConfig {
    /// Name of the cache whose entries are ranked.
    pub cache_name: String,
    /// Cache service that owns the partitions (membership scope).
    pub cache_service_name: String,
    /// Service the per-node tasks are dispatched through.
    pub invocation_service_name: String,
    /// Maximum number of hot keys in the global ranking.
    pub top_n: usize,
}

impl HotKeysConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_cache_name(mut self, cache_name: impl Into<String>) -> Self {
        self.cache_name = cache_name.into();
        self
    }

    /// Rejects blank service or cache names. `top_n == 0` is allowed and
    /// yields an empty ranking.
    pub fn validate(&self) -> Result<(), HotKeysError> {
        let fields = [
            ("cache name", &self.cache_name),
            ("cache service name", &self.cache_service_name),
            ("invocation service name", &self.invocation_service_name),
        ];

        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(HotKeysError::InvalidConfig(format!("{} must not be empty", label)));
            }
        }

        Ok(())
    }
}

impl Default for HotKeysConfig {
    fn default() -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            cache_service_name: DEFAULT_CACHE_SERVICE_NAME.to_string(),
            invocation_service_name: DEFAULT_INVOCATION_SERVICE_NAME.to_string(),
            top_n: DEFAULT_TOP_N,
        }
    }
}
