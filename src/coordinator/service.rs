use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::outcomes::{MemberOutcome, OutcomeTable};
use crate::config::HotKeysConfig;
use crate::error::{HotKeysError, HotKeysResult};
use crate::invocation::{InvocationEvent, InvocationService, NodeOutcome};
use crate::membership::service::MembershipDirectory;
use crate::report::{GlobalReport, merge_outcomes};
use crate::task::HotKeyTask;

/// Fans a hot-key task out to every storage member and gathers the answers.
pub struct HotKeysCoordinator<K> {
    directory: Arc<dyn MembershipDirectory>,
    invocation: Arc<dyn InvocationService<K>>,
}

impl<K> HotKeysCoordinator<K>
where
    K: Ord + Clone + Send + 'static,
{
    pub fn new(
        directory: Arc<dyn MembershipDirectory>,
        invocation: Arc<dyn InvocationService<K>>,
    ) -> Self {
        Self {
            directory,
            invocation,
        }
    }

    /// Fetches the global top-N, waiting as long as the slowest member takes.
    pub async fn fetch_top_n(&self, config: &HotKeysConfig) -> HotKeysResult<GlobalReport<K>> {
        self.fetch_top_n_with_cancel(config, CancellationToken::new())
            .await
    }

    /// Like [`fetch_top_n`](Self::fetch_top_n) but gives up once `deadline` has elapsed.
    pub async fn fetch_top_n_with_deadline(
        &self,
        config: &HotKeysConfig,
        deadline: Duration,
    ) -> HotKeysResult<GlobalReport<K>> {
        match tokio::time::timeout(deadline, self.fetch_top_n(config)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Hot-keys fetch abandoned after {:?}", deadline);
                Err(HotKeysError::Interrupted(format!(
                    "deadline of {:?} elapsed",
                    deadline
                )))
            }
        }
    }

    /// Like [`fetch_top_n`](Self::fetch_top_n) but stops waiting once `cancel` fires.
    ///
    /// Tasks already dispatched are left to finish on their own; their outcomes
    /// are dropped.
    pub async fn fetch_top_n_with_cancel(
        &self,
        config: &HotKeysConfig,
        cancel: CancellationToken,
    ) -> HotKeysResult<GlobalReport<K>> {
        config.validate()?;

        let started = Instant::now();
        let outcomes = self.gather(config, &cancel).await?;
        let total_elapsed = started.elapsed();

        Ok(merge_outcomes(outcomes, config.top_n, total_elapsed))
    }

    /// Init, dispatch and await. Returns one outcome per storage member.
    pub async fn gather(
        &self,
        config: &HotKeysConfig,
        cancel: &CancellationToken,
    ) -> HotKeysResult<Vec<MemberOutcome<K>>> {
        if self.invocation.name() != config.invocation_service_name {
            return Err(HotKeysError::InvalidConfig(format!(
                "invocation service '{}' is not available (coordinator uses '{}')",
                config.invocation_service_name,
                self.invocation.name()
            )));
        }

        // A directory scoped to another service has no storage members for this one.
        if self.directory.service_name() != config.cache_service_name {
            return Err(HotKeysError::NoStorageMembers {
                service: config.cache_service_name.clone(),
            });
        }

        let members = self.directory.storage_members();
        if members.is_empty() {
            return Err(HotKeysError::NoStorageMembers {
                service: self.directory.service_name().to_string(),
            });
        }

        info!(
            "Fetching top {} hot keys of cache {} from {} storage members via {}",
            config.top_n,
            config.cache_name,
            members.len(),
            self.invocation.name()
        );
        for member in &members {
            info!("  - {}", member);
        }

        let task = HotKeyTask::from_config(config);
        let mut table = OutcomeTable::new(&members);
        let (events, mut inbox) = mpsc::unbounded_channel();

        for member in members {
            self.invocation
                .dispatch(task.clone(), member, events.clone());
        }
        drop(events);

        while !table.is_complete() {
            tokio::select! {
                _ = cancel.cancelled() => {
                    warn!(
                        "Interrupted while awaiting invocation completion ({} pending)",
                        table.pending()
                    );
                    return Err(HotKeysError::Interrupted(format!(
                        "cancelled with {} members pending",
                        table.pending()
                    )));
                }
                event = inbox.recv() => match event {
                    Some(event) => record_event(&mut table, event),
                    None => {
                        // Every sender is gone, so nothing else can arrive.
                        warn!(
                            "Invocation service went quiet with {} members pending",
                            table.pending()
                        );
                        table.fill_missing(|| {
                            NodeOutcome::Failed("No outcome reported by invocation service".to_string())
                        });
                    }
                }
            }
        }

        info!("Invocation completed");
        Ok(table.into_outcomes())
    }
}

fn record_event<K>(table: &mut OutcomeTable<K>, event: InvocationEvent<K>) {
    match &event.outcome {
        NodeOutcome::Completed(_) => info!("Task completed on {}", event.member),
        NodeOutcome::Failed(error) => warn!("Task failed on {}: {}", event.member, error),
        NodeOutcome::Departed => warn!("Member left before task completed: {}", event.member),
    }

    table.record(&event.member, event.outcome);
}
