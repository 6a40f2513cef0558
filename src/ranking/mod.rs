//! Bounded Ranking Module
//!
//! A capacity-limited, always-sorted container of scored keys. The same structure
//! is used in two places:
//!
//! - **Local aggregation**: a node scans every entry it owns and keeps only the
//!   `top_n` hottest, so memory stays O(top_n) no matter how many entries it holds.
//! - **Global merge**: the coordinator folds each node's ranking into one target,
//!   again bounded to `top_n`, without ever materialising the full key population.
//!
//! ## Submodules
//! - **`types`**: `ScoredKey`, the (key, touch count) pair and its ordering.
//! - **`bounded`**: `BoundedRanking` and the lock-guarded `SharedRanking` merge target.

pub mod bounded;
pub mod types;

pub use bounded::{BoundedRanking, SharedRanking};
pub use types::ScoredKey;

#[cfg(test)]
mod tests;
