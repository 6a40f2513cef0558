use std::collections::HashMap;

use crate::invocation::NodeOutcome;
use crate::membership::types::{ClusterMember, MemberId};

/// A member together with its terminal outcome.
#[derive(Debug, Clone)]
pub struct MemberOutcome<K> {
    pub member: ClusterMember,
    pub outcome: NodeOutcome<K>,
}

/// Completion accounting for one fetch.
///
/// Knows which members were dispatched to and accepts exactly one outcome for
/// each. Owned by the awaiting task alone; outcome events reach it over a channel.
#[derive(Debug)]
pub struct OutcomeTable<K> {
    expected: HashMap<MemberId, ClusterMember>,
    recorded: HashMap<MemberId, NodeOutcome<K>>,
}

impl<K> OutcomeTable<K> {
    pub fn new(members: &[ClusterMember]) -> Self {
        Self {
            expected: members
                .iter()
                .map(|member| (member.id.clone(), member.clone()))
                .collect(),
            recorded: HashMap::with_capacity(members.len()),
        }
    }

    /// Records an outcome. Returns `false`, leaving the table untouched, for a
    /// member that was never dispatched to or that already reported.
    pub fn record(&mut self, member: &ClusterMember, outcome: NodeOutcome<K>) -> bool {
        if !self.expected.contains_key(&member.id) {
            tracing::warn!("Ignoring {} outcome from undispatched {}", outcome.label(), member);
            return false;
        }
        if self.recorded.contains_key(&member.id) {
            tracing::warn!("Ignoring second {} outcome from {}", outcome.label(), member);
            return false;
        }

        self.recorded.insert(member.id.clone(), outcome);
        true
    }

    /// Members still owing an outcome.
    pub fn pending(&self) -> usize {
        self.expected.len() - self.recorded.len()
    }

    pub fn is_complete(&self) -> bool {
        self.pending() == 0
    }

    /// Gives every silent member the same outcome. Used when no more events can arrive.
    pub fn fill_missing(&mut self, outcome: impl Fn() -> NodeOutcome<K>) {
        for id in self.expected.keys() {
            if !self.recorded.contains_key(id) {
                self.recorded.insert(id.clone(), outcome());
            }
        }
    }

    /// Outcomes for every dispatched member, ordered by member id.
    pub fn into_outcomes(mut self) -> Vec<MemberOutcome<K>> {
        let mut outcomes: Vec<MemberOutcome<K>> = self
            .expected
            .into_values()
            .filter_map(|member| {
                self.recorded
                    .remove(&member.id)
                    .map(|outcome| MemberOutcome { member, outcome })
            })
            .collect();
        outcomes.sort_by(|a, b| a.member.id.cmp(&b.member.id));
        outcomes
    }
}
