//! Storage member HTTP surface.
//!
//! A member serves client reads and writes on its local store plus the internal
//! endpoint the coordinator dispatches hot-key tasks to.

use anyhow::Result;
use axum::{
    Extension, Router,
    routing::{get, post},
};
use serde::Serialize;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use crate::invocation::handlers::handle_hot_keys;
use crate::invocation::protocol::ENDPOINT_HOT_KEYS;
use crate::storage::handlers::{handle_get, handle_put};
use crate::storage::memory::LocalStore;
use crate::storage::protocol::{ENDPOINT_GET, ENDPOINT_PUT};

/// Router for one storage member. `K` is the logical key type of its caches.
pub fn node_router<K>(store: Arc<LocalStore>) -> Router
where
    K: ToString + FromStr + Ord + Clone + Serialize + Send + Sync + 'static,
    <K as FromStr>::Err: Display,
{
    Router::new()
        .route(ENDPOINT_PUT, post(handle_put))
        .route(&format!("{}/:cache/:key", ENDPOINT_GET), get(handle_get))
        .route(ENDPOINT_HOT_KEYS, post(handle_hot_keys::<K>))
        .layer(Extension(store))
}

/// Serves [`node_router`] until the listener fails.
pub async fn serve<K>(bind_addr: SocketAddr, store: Arc<LocalStore>) -> Result<()>
where
    K: ToString + FromStr + Ord + Clone + Serialize + Send + Sync + 'static,
    <K as FromStr>::Err: Display,
{
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(
        "Storage member {} listening on {}",
        store.member_id(),
        listener.local_addr()?
    );

    axum::serve(listener, node_router::<K>(store)).await?;
    Ok(())
}
