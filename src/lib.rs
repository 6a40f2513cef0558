//! Distributed Hot Keys Library
//!
//! Finds the most frequently accessed keys of a partitioned in-memory cache spread
//! over many cluster members. A coordinator asks every storage-owning member for
//! its locally hottest keys and merges the answers into one global top-N, without
//! ever materialising the full key population.
//!
//! ## Architecture Modules
//! - **`ranking`**: `BoundedRanking`, the capacity-limited sorted set used both for
//!   per-member aggregation and for the global merge.
//! - **`task`**: `HotKeyTask`, the scan a storage member runs over its own entries.
//! - **`coordinator`**: the scatter-gather driver: dispatch one task per member,
//!   wait for exactly one outcome from each.
//! - **`report`**: merges the outcomes into a `GlobalReport` with per-member coverage.
//! - **`invocation`**: execution substrates (in-process and HTTP).
//! - **`membership`**: the member directory and departure notifications.
//! - **`storage`**: the partitioned store with per-entry touch counters.
//! - **`cluster`**: an in-process cluster and the warm-up routine.
//! - **`node`**: the HTTP surface of a storage member.

pub mod cluster;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod invocation;
pub mod membership;
pub mod node;
pub mod ranking;
pub mod report;
pub mod storage;
pub mod task;

pub use config::HotKeysConfig;
pub use coordinator::HotKeysCoordinator;
pub use error::{HotKeysError, TaskError};
pub use ranking::{BoundedRanking, ScoredKey, SharedRanking};
pub use report::GlobalReport;
