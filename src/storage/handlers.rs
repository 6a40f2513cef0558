use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};
use std::sync::Arc;

use super::memory::LocalStore;
use super::partitioner::{DEFAULT_PARTITIONS, partition_of};
use super::protocol::{GetResponse, PutRequest, PutResponse};

pub async fn handle_put(
    Extension(store): Extension<Arc<LocalStore>>,
    Json(req): Json<PutRequest>,
) -> (StatusCode, Json<PutResponse>) {
    if serde_json::from_str::<serde_json::Value>(&req.value_json).is_err() {
        tracing::error!("Rejected put for key {}: value is not valid JSON", req.key);
        return (
            StatusCode::BAD_REQUEST,
            Json(PutResponse { success: false }),
        );
    }

    let partition = partition_of(&req.key, DEFAULT_PARTITIONS);
    store
        .ensure_cache(&req.cache)
        .store(partition, req.key, req.value_json);

    (StatusCode::OK, Json(PutResponse { success: true }))
}

pub async fn handle_get(
    Extension(store): Extension<Arc<LocalStore>>,
    Path((cache_name, key)): Path<(String, String)>,
) -> (StatusCode, Json<GetResponse>) {
    let partition = partition_of(&key, DEFAULT_PARTITIONS);

    match store
        .cache(&cache_name)
        .and_then(|cache| cache.get(partition, &key))
    {
        Some(value_json) => (
            StatusCode::OK,
            Json(GetResponse {
                value_json: Some(value_json),
            }),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(GetResponse { value_json: None }),
        ),
    }
}
