//! Hot-keys Network Protocol
//!
//! DTOs exchanged between the coordinator and a storage member when a task is
//! executed remotely. Rankings travel as JSON.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ranking::BoundedRanking;
use crate::task::HotKeyTask;

/// Internal endpoint executing a hot-key task on the receiving member.
pub const ENDPOINT_HOT_KEYS: &str = "/internal/hotkeys";

#[derive(Debug, Serialize, Deserialize)]
pub struct HotKeysRequest {
    pub task: HotKeyTask,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Ord + Clone + Serialize",
    deserialize = "K: Ord + Clone + DeserializeOwned"
))]
pub struct HotKeysResponse<K> {
    pub ranking: BoundedRanking<K>,
}

/// Body of a non-2xx answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
