use tokio::sync::mpsc;

use crate::membership::types::ClusterMember;
use crate::ranking::BoundedRanking;
use crate::task::HotKeyTask;

/// Terminal result of one member's task.
#[derive(Debug, Clone)]
pub enum NodeOutcome<K> {
    Completed(BoundedRanking<K>),
    /// The task ran but raised an error on the member.
    Failed(String),
    /// The member left before a result or an error was available.
    Departed,
}

impl<K> NodeOutcome<K> {
    pub fn label(&self) -> &'static str {
        match self {
            NodeOutcome::Completed(_) => "completed",
            NodeOutcome::Failed(_) => "failed",
            NodeOutcome::Departed => "departed",
        }
    }
}

/// One outcome, tagged with the member it belongs to.
#[derive(Debug, Clone)]
pub struct InvocationEvent<K> {
    pub member: ClusterMember,
    pub outcome: NodeOutcome<K>,
}

pub type EventSender<K> = mpsc::UnboundedSender<InvocationEvent<K>>;

/// Dispatches hot-key tasks to members.
///
/// `dispatch` returns immediately; the work runs on the tokio runtime and must
/// send exactly one event for `member` on `events`.
pub trait InvocationService<K>: Send + Sync {
    fn name(&self) -> &str;

    fn dispatch(&self, task: HotKeyTask, member: ClusterMember, events: EventSender<K>);
}

pub(crate) fn deliver<K>(events: &EventSender<K>, member: ClusterMember, outcome: NodeOutcome<K>) {
    let label = outcome.label();
    if events.send(InvocationEvent { member, outcome }).is_err() {
        // The coordinator stopped listening (cancelled or timed out).
        tracing::debug!("Dropped {} outcome: fetch no longer awaiting", label);
    }
}
