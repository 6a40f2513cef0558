use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use super::types::{EventSender, InvocationService, NodeOutcome, deliver};
use crate::error::TaskError;
use crate::membership::service::MembershipService;
use crate::membership::types::{ClusterMember, MemberId, MembershipEvent};
use crate::storage::codec::{KeyCodec, StringKeyCodec};
use crate::storage::memory::StoreRegistry;
use crate::task::HotKeyTask;

/// Runs tasks against the stores hosted in this process, one worker per member.
///
/// The scan runs on the blocking pool and is raced against the member's
/// departure. A scan that panics is reported as a failure.
pub struct LocalInvocationService<C = StringKeyCodec> {
    name: String,
    membership: Arc<MembershipService>,
    stores: Arc<StoreRegistry>,
    codec: Arc<C>,
}

impl LocalInvocationService<StringKeyCodec> {
    pub fn new(
        name: impl Into<String>,
        membership: Arc<MembershipService>,
        stores: Arc<StoreRegistry>,
    ) -> Self {
        Self::with_codec(name, membership, stores, StringKeyCodec)
    }
}

impl<C> LocalInvocationService<C> {
    pub fn with_codec(
        name: impl Into<String>,
        membership: Arc<MembershipService>,
        stores: Arc<StoreRegistry>,
        codec: C,
    ) -> Self {
        Self {
            name: name.into(),
            membership,
            stores,
            codec: Arc::new(codec),
        }
    }
}

impl<K, C> InvocationService<K> for LocalInvocationService<C>
where
    K: Ord + Clone + Send + 'static,
    C: KeyCodec<K> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn dispatch(&self, task: HotKeyTask, member: ClusterMember, events: EventSender<K>) {
        // Subscribe before the liveness check so a departure in between is not missed.
        let mut departures = self.membership.subscribe();
        let alive = self.membership.is_alive(&member.id);
        let store = self.stores.get(&member.id).map(|entry| entry.value().clone());
        let membership = self.membership.clone();
        let codec = self.codec.clone();

        tokio::spawn(async move {
            let outcome = match store {
                Some(store) if alive => {
                    let scan = tokio::task::spawn_blocking(move || {
                        task.run::<K, C>(&store, codec.as_ref())
                    });

                    tokio::select! {
                        joined = scan => match joined {
                            Ok(Ok(ranking)) => NodeOutcome::Completed(ranking),
                            Ok(Err(e)) => NodeOutcome::Failed(e.to_string()),
                            Err(e) => NodeOutcome::Failed(TaskError::Panicked(e.to_string()).to_string()),
                        },
                        _ = wait_for_departure(&mut departures, &membership, &member.id) => {
                            NodeOutcome::Departed
                        }
                    }
                }
                Some(_) => NodeOutcome::Departed,
                None => {
                    tracing::warn!("No store hosted for {}", member);
                    NodeOutcome::Departed
                }
            };

            deliver(&events, member, outcome);
        });
    }
}

/// Resolves once `id` is reported as departed. Never resolves if the
/// membership service goes away.
async fn wait_for_departure(
    departures: &mut broadcast::Receiver<MembershipEvent>,
    membership: &MembershipService,
    id: &MemberId,
) {
    loop {
        match departures.recv().await {
            Ok(MembershipEvent::Departed(departed)) if &departed == id => return,
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!("Departure watch lagged by {} events", skipped);
                if !membership.is_alive(id) {
                    return;
                }
            }
            Err(RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
}
