//! In-Process Cluster Module
//!
//! Runs a whole cluster inside one process: a coordinator member plus any number of
//! storage members, each with its own `LocalStore`. Tasks reach the stores through
//! `LocalInvocationService`, one tokio worker per member. Used by the `local`
//! command and by the end-to-end tests.
//!
//! ## Submodules
//! - **`local`**: `LocalCluster`, membership + stores + routing wired together.
//! - **`warmup`**: seeds a cache and generates a skewed access pattern.

pub mod local;
pub mod warmup;

pub use local::LocalCluster;
pub use warmup::{WarmupPlan, warmup};

#[cfg(test)]
mod tests;
