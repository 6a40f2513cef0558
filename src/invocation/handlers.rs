use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use super::protocol::{ErrorResponse, HotKeysRequest, HotKeysResponse};
use crate::error::TaskError;
use crate::storage::codec::StringKeyCodec;
use crate::storage::memory::LocalStore;

/// Runs the requested hot-key task against this member's store.
///
/// Task errors come back as `500` with an [`ErrorResponse`]; they never take
/// the member down.
pub async fn handle_hot_keys<K>(
    Extension(store): Extension<Arc<LocalStore>>,
    Json(req): Json<HotKeysRequest>,
) -> Response
where
    K: ToString + FromStr + Ord + Clone + Serialize + Send + 'static,
    <K as FromStr>::Err: Display,
{
    let task = req.task;
    tracing::info!(
        "Running hot-keys task on member {} (cache: {}, top {})",
        store.member_id(),
        task.cache_name,
        task.top_n
    );

    let result =
        tokio::task::spawn_blocking(move || task.run::<K, StringKeyCodec>(&store, &StringKeyCodec))
            .await
            .unwrap_or_else(|e| Err(TaskError::Panicked(e.to_string())));

    match result {
        Ok(ranking) => (StatusCode::OK, Json(HotKeysResponse { ranking })).into_response(),
        Err(e) => {
            tracing::error!("Hot-keys task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
