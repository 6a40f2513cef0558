use std::time::Duration;
use tracing::{info, warn};

use super::types::{GlobalReport, NodeReport, NodeStatus};
use crate::coordinator::MemberOutcome;
use crate::invocation::NodeOutcome;
use crate::ranking::SharedRanking;

/// Merges per-member outcomes into the global top-`top_n`.
///
/// Outcomes may come in any order; the merged ranking is the same either way.
pub fn merge_outcomes<K>(
    outcomes: Vec<MemberOutcome<K>>,
    top_n: usize,
    total_elapsed: Duration,
) -> GlobalReport<K>
where
    K: Ord + Clone,
{
    let merged = SharedRanking::new(top_n);
    let mut nodes = Vec::with_capacity(outcomes.len());

    for MemberOutcome { member, outcome } in outcomes {
        let status = match outcome {
            NodeOutcome::Completed(ranking) => {
                let elapsed = ranking.elapsed();
                info!(
                    "Execution on member {} took {} ms",
                    member,
                    elapsed.as_millis()
                );
                merged.merge_from(&ranking);
                NodeStatus::Succeeded {
                    elapsed,
                    reported: ranking.len(),
                }
            }
            NodeOutcome::Failed(error) => {
                warn!("Missing result for member {}: task failed", member);
                NodeStatus::Failed { error }
            }
            NodeOutcome::Departed => {
                warn!("Missing result for member {}: member departed", member);
                NodeStatus::Departed
            }
        };
        nodes.push(NodeReport { member, status });
    }

    nodes.sort_by(|a, b| a.member.id.cmp(&b.member.id));

    info!(
        "Total gathering of top {} hot keys took {} ms",
        top_n,
        total_elapsed.as_millis()
    );

    GlobalReport {
        top_n,
        nodes,
        total_elapsed,
        hot_keys: merged.into_inner().to_descending(),
    }
}
