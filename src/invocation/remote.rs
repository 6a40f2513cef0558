use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use super::protocol::{ENDPOINT_HOT_KEYS, ErrorResponse, HotKeysRequest, HotKeysResponse};
use super::types::{EventSender, InvocationService, NodeOutcome, deliver};
use crate::membership::service::MembershipService;
use crate::membership::types::ClusterMember;
use crate::task::HotKeyTask;

/// Runs tasks on other processes by POSTing them to each member's
/// `/internal/hotkeys` endpoint.
///
/// A refused or reset connection means the member is gone and is reported as
/// departed; any answer from the member that is not a ranking is a failure.
pub struct HttpInvocationService {
    name: String,
    membership: Arc<MembershipService>,
    http_client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpInvocationService {
    pub fn new(name: impl Into<String>, membership: Arc<MembershipService>) -> Self {
        Self {
            name: name.into(),
            membership,
            http_client: reqwest::Client::new(),
            timeout: None,
        }
    }

    /// Per-request timeout. A timed-out member is reported as failed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl<K> InvocationService<K> for HttpInvocationService
where
    K: Ord + Clone + DeserializeOwned + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn dispatch(&self, task: HotKeyTask, member: ClusterMember, events: EventSender<K>) {
        let client = self.http_client.clone();
        let membership = self.membership.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let outcome = if membership.is_alive(&member.id) {
                invoke_remote::<K>(&client, &member, task, timeout).await
            } else {
                NodeOutcome::Departed
            };

            // A member that left while we were waiting gets no blame for the error.
            let outcome = match outcome {
                NodeOutcome::Failed(_) if !membership.is_alive(&member.id) => NodeOutcome::Departed,
                other => other,
            };

            deliver(&events, member, outcome);
        });
    }
}

async fn invoke_remote<K>(
    client: &reqwest::Client,
    member: &ClusterMember,
    task: HotKeyTask,
    timeout: Option<Duration>,
) -> NodeOutcome<K>
where
    K: Ord + Clone + DeserializeOwned,
{
    let url = format!("http://{}{}", member.socket_addr(), ENDPOINT_HOT_KEYS);
    let mut request = client.post(url).json(&HotKeysRequest { task });
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) if e.is_connect() => {
            tracing::warn!("{} unreachable: {}", member, e);
            return NodeOutcome::Departed;
        }
        Err(e) => {
            tracing::error!("Hot-keys request to {} failed: {}", member, e);
            return NodeOutcome::Failed(e.to_string());
        }
    };

    let status = response.status();
    if status.is_success() {
        return match response.json::<HotKeysResponse<K>>().await {
            Ok(body) => NodeOutcome::Completed(body.ranking),
            Err(e) => NodeOutcome::Failed(format!("Malformed ranking from member: {}", e)),
        };
    }

    let detail = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => "no error detail".to_string(),
    };
    NodeOutcome::Failed(format!("{}: {}", status, detail))
}
