//! Membership & Discovery Module
//!
//! Keeps the directory of cluster members the coordinator fans out to. Each member
//! carries its address and role, and whether it owns storage partitions; only
//! storage-owning members receive hot-key tasks.
//!
//! ## Core Mechanisms
//! - **Directory**: `MembershipDirectory` is the seam the coordinator reads the
//!   storage-owning member set through.
//! - **Departure events**: members leaving the cluster are published on a broadcast
//!   channel so in-flight tasks on that member can be reported as departed.

pub mod service;
pub mod types;
