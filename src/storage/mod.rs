//! Distributed Storage Module
//!
//! A partitioned in-memory key-value store whose entries count how often they are
//! read. The hot-key scan only ever reads from this layer.
//!
//! ## Core Concepts
//! - **Local store**: each member holds named caches, split into partitions, with an
//!   access counter on every entry.
//! - **Key codec**: keys are stored in an internal string form and decoded back to
//!   the logical key type when ranked.
//! - **Partitioning**: `PartitionManager` hashes keys to partitions and assigns each
//!   partition to one storage member.
//! - **Access**: `DistributedCache` routes reads and writes to the owning member's store.

pub mod cache;
pub mod codec;
pub mod handlers;
pub mod memory;
pub mod partitioner;
pub mod protocol;
