use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::membership::types::ClusterMember;
use crate::ranking::ScoredKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeStatus {
    Succeeded {
        /// Time the member spent ranking its entries.
        elapsed: Duration,
        /// Number of keys the member reported.
        reported: usize,
    },
    Failed {
        error: String,
    },
    Departed,
}

/// Coverage line for one storage member.
#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    pub member: ClusterMember,
    pub status: NodeStatus,
}

impl NodeReport {
    pub fn is_missing(&self) -> bool {
        !matches!(self.status, NodeStatus::Succeeded { .. })
    }
}

/// The outcome of a complete fetch.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalReport<K> {
    pub top_n: usize,
    /// Every member the fetch dispatched to, exactly once, ordered by id.
    pub nodes: Vec<NodeReport>,
    /// Wall-clock time from dispatch to the last outcome.
    pub total_elapsed: Duration,
    /// Global ranking, hottest first, at most `top_n` long.
    pub hot_keys: Vec<ScoredKey<K>>,
}

impl<K> GlobalReport<K> {
    pub fn missing_nodes(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes.iter().filter(|node| node.is_missing())
    }

    /// True when every member contributed.
    pub fn is_complete(&self) -> bool {
        self.missing_nodes().next().is_none()
    }
}

impl<K: fmt::Display> fmt::Display for GlobalReport<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            match &node.status {
                NodeStatus::Succeeded { elapsed, .. } => writeln!(
                    f,
                    "Execution on member {} took {} ms",
                    node.member,
                    elapsed.as_millis()
                )?,
                NodeStatus::Failed { error } => writeln!(
                    f,
                    "Error: missing result for member {} (task failed: {})",
                    node.member, error
                )?,
                NodeStatus::Departed => writeln!(
                    f,
                    "Error: missing result for member {} (member left before task completed)",
                    node.member
                )?,
            }
        }

        writeln!(
            f,
            "Total gathering of top {} hot keys took {} ms",
            self.top_n,
            self.total_elapsed.as_millis()
        )?;
        for (rank, item) in self.hot_keys.iter().enumerate() {
            writeln!(f, "{:>4}. {}", rank + 1, item)?;
        }
        Ok(())
    }
}
