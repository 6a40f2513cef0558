//! Fetches over real HTTP between a coordinator and storage members.

use std::net::SocketAddr;
use std::sync::Arc;

use distributed_hotkeys::config::HotKeysConfig;
use distributed_hotkeys::coordinator::HotKeysCoordinator;
use distributed_hotkeys::invocation::HttpInvocationService;
use distributed_hotkeys::membership::service::MembershipService;
use distributed_hotkeys::membership::types::{ClusterMember, MemberId};
use distributed_hotkeys::node::node_router;
use distributed_hotkeys::ranking::ScoredKey;
use distributed_hotkeys::report::NodeStatus;
use distributed_hotkeys::storage::memory::LocalStore;
use distributed_hotkeys::storage::protocol::{GetResponse, PutRequest, PutResponse};

const CACHE: &str = "default_cache";
const SERVICE: &str = "DistributedCache";

async fn spawn_member(id: &str) -> (ClusterMember, Arc<LocalStore>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let member = ClusterMember::storage(id, addr);
    let store = LocalStore::new(member.id.clone(), SERVICE);
    store.ensure_cache(CACHE);

    let app = node_router::<u32>(store.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (member, store)
}

async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn seed(store: &LocalStore, key: u32, reads: usize) {
    let cache = store.ensure_cache(CACHE);
    cache.store(0, key.to_string(), "\"value\"".to_string());
    for _ in 0..reads {
        cache.get(0, &key.to_string());
    }
}

fn coordinator(members: &[ClusterMember]) -> HotKeysCoordinator<u32> {
    let membership = MembershipService::new(
        SERVICE,
        ClusterMember::client("coordinator", SocketAddr::from(([127, 0, 0, 1], 0))),
    );
    for member in members {
        membership.join(member.clone());
    }
    let invocation = HttpInvocationService::new("InvocationService", membership.clone());
    HotKeysCoordinator::new(membership, Arc::new(invocation))
}

#[tokio::test]
async fn test_fetch_merges_rankings_over_http() {
    let (a, store_a) = spawn_member("node-a").await;
    let (b, store_b) = spawn_member("node-b").await;
    seed(&store_a, 7, 9);
    seed(&store_a, 1, 1);
    seed(&store_b, 3, 5);
    seed(&store_b, 4, 2);

    let config = HotKeysConfig::default().with_top_n(3);
    let report = coordinator(&[a, b]).fetch_top_n(&config).await.unwrap();

    assert!(report.is_complete());
    assert_eq!(
        report.hot_keys,
        vec![
            ScoredKey::new(7, 9),
            ScoredKey::new(3, 5),
            ScoredKey::new(4, 2),
        ]
    );
}

#[tokio::test]
async fn test_unreachable_member_is_departed() {
    let (a, store_a) = spawn_member("node-a").await;
    seed(&store_a, 11, 3);
    let dead = ClusterMember::storage("node-dead", closed_addr().await);

    let config = HotKeysConfig::default().with_top_n(5);
    let report = coordinator(&[a, dead]).fetch_top_n(&config).await.unwrap();

    assert_eq!(report.hot_keys, vec![ScoredKey::new(11, 3)]);
    let missing: Vec<_> = report.missing_nodes().collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].member.id, MemberId::from("node-dead"));
    assert_eq!(missing[0].status, NodeStatus::Departed);
}

#[tokio::test]
async fn test_remote_task_error_is_failed() {
    let (a, _store) = spawn_member("node-a").await;

    let config = HotKeysConfig::default().with_cache_name("missing");
    let report = coordinator(&[a]).fetch_top_n(&config).await.unwrap();

    match &report.nodes[0].status {
        NodeStatus::Failed { error } => assert!(error.contains("missing")),
        other => panic!("Expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_reads_feed_touch_counts() {
    let (member, store) = spawn_member("node-a").await;
    let base = format!("http://{}", member.socket_addr());
    let client = reqwest::Client::new();

    let put: PutResponse = client
        .post(format!("{}/put", base))
        .json(&PutRequest {
            cache: CACHE.to_string(),
            key: "42".to_string(),
            value_json: "\"Price plan #42\"".to_string(),
        })
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(put.success);

    for _ in 0..3 {
        let got: GetResponse = client
            .get(format!("{}/get/{}/42", base, CACHE))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(got.value_json.as_deref(), Some("\"Price plan #42\""));
    }

    let missing = client
        .get(format!("{}/get/{}/43", base, CACHE))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    let config = HotKeysConfig::default().with_top_n(1);
    let report = coordinator(&[member]).fetch_top_n(&config).await.unwrap();
    assert_eq!(report.hot_keys, vec![ScoredKey::new(42, 3)]);
    assert_eq!(store.local_entry_count(), 1);
}
