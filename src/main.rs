use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use distributed_hotkeys::cluster::{LocalCluster, WarmupPlan, warmup};
use distributed_hotkeys::config::{
    DEFAULT_CACHE_NAME, DEFAULT_CACHE_SERVICE_NAME, DEFAULT_INVOCATION_SERVICE_NAME, DEFAULT_TOP_N,
    HotKeysConfig,
};
use distributed_hotkeys::coordinator::HotKeysCoordinator;
use distributed_hotkeys::invocation::HttpInvocationService;
use distributed_hotkeys::membership::service::MembershipService;
use distributed_hotkeys::membership::types::ClusterMember;
use distributed_hotkeys::node;
use distributed_hotkeys::storage::cache::DistributedCache;
use distributed_hotkeys::storage::memory::{LocalStore, StoreRegistry};
use distributed_hotkeys::storage::partitioner::PartitionManager;

#[derive(Parser, Debug)]
#[command(name = "hotkeys", about = "Find the most accessed keys of a distributed cache")]
struct Cli {
    /// Number of hot keys to fetch.
    #[arg(short = 'n', long = "top-n", global = true, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,

    /// Name of the cache to rank.
    #[arg(short = 'c', long = "cache", global = true, default_value = DEFAULT_CACHE_NAME)]
    cache_name: String,

    /// Cache service owning the storage members.
    #[arg(short = 'd', long = "cache-service", global = true, default_value = DEFAULT_CACHE_SERVICE_NAME)]
    cache_service_name: String,

    /// Invocation service used to dispatch the per-member tasks.
    #[arg(short = 'i', long = "invocation-service", global = true, default_value = DEFAULT_INVOCATION_SERVICE_NAME)]
    invocation_service_name: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start an in-process cluster, warm it up and fetch the hot keys.
    Local {
        /// Number of storage members.
        #[arg(long, default_value_t = 3)]
        nodes: usize,

        /// Entries written during warm-up.
        #[arg(long, default_value_t = 100_000)]
        warmup_entries: u32,

        /// Skip the warm-up phase.
        #[arg(long)]
        no_warmup: bool,
    },
    /// Run a single storage member serving the HTTP endpoints.
    Serve {
        /// Address to listen on.
        #[arg(long)]
        bind: SocketAddr,

        /// Member id. A random one is generated when omitted.
        #[arg(long)]
        id: Option<String>,

        /// Entries written to the local store before serving. 0 disables warm-up.
        #[arg(long, default_value_t = 0)]
        warmup_entries: u32,
    },
    /// Fetch the hot keys from running storage members over HTTP.
    Fetch {
        /// Storage member as `ID=ADDR`. Repeat for every member.
        #[arg(long = "node", required = true, value_parser = parse_node)]
        nodes: Vec<(String, SocketAddr)>,

        /// Per-member request timeout in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

fn parse_node(raw: &str) -> Result<(String, SocketAddr)> {
    let (id, addr) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected ID=ADDR, got {}", raw))?;
    let addr = addr
        .parse()
        .with_context(|| format!("invalid address for member {}", id))?;
    Ok((id.to_string(), addr))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = HotKeysConfig {
        cache_name: cli.cache_name,
        cache_service_name: cli.cache_service_name,
        invocation_service_name: cli.invocation_service_name,
        top_n: cli.top_n,
    };
    config.validate()?;

    println!("-n={}", config.top_n);
    println!("-c={}", config.cache_name);
    println!("-d={}", config.cache_service_name);
    println!("-i={}", config.invocation_service_name);

    match cli.command {
        Command::Local {
            nodes,
            warmup_entries,
            no_warmup,
        } => run_local(&config, nodes, warmup_entries, no_warmup).await,
        Command::Serve {
            bind,
            id,
            warmup_entries,
        } => run_serve(&config, bind, id, warmup_entries).await,
        Command::Fetch { nodes, timeout_ms } => run_fetch(&config, nodes, timeout_ms).await,
    }
}

async fn run_local(
    config: &HotKeysConfig,
    nodes: usize,
    warmup_entries: u32,
    no_warmup: bool,
) -> Result<()> {
    let cluster = LocalCluster::start(config, nodes);

    if !no_warmup {
        let plan = WarmupPlan::default().with_entries(warmup_entries);
        warmup(&cluster.cache::<u32, String>(), &plan)?;
    }

    let report = cluster.coordinator::<u32>().fetch_top_n(config).await?;
    print!("{}", report);
    Ok(())
}

async fn run_serve(
    config: &HotKeysConfig,
    bind: SocketAddr,
    id: Option<String>,
    warmup_entries: u32,
) -> Result<()> {
    let member = match id {
        Some(id) => ClusterMember::storage(id, bind),
        None => ClusterMember::storage(uuid::Uuid::new_v4().to_string(), bind),
    };
    tracing::info!("Starting {}", member);

    let membership = MembershipService::new(config.cache_service_name.clone(), member.clone());
    let store = LocalStore::new(member.id.clone(), config.cache_service_name.clone());
    store.ensure_cache(&config.cache_name);

    if warmup_entries > 0 {
        // The member owns every partition of a single-member view.
        let stores = Arc::new(StoreRegistry::new());
        stores.insert(member.id.clone(), store.clone());
        let cache: DistributedCache<u32, String> = DistributedCache::new(
            config.cache_name.clone(),
            PartitionManager::new(membership),
            stores,
        );
        warmup(&cache, &WarmupPlan::default().with_entries(warmup_entries))?;
    }

    node::serve::<u32>(bind, store).await
}

async fn run_fetch(
    config: &HotKeysConfig,
    nodes: Vec<(String, SocketAddr)>,
    timeout_ms: Option<u64>,
) -> Result<()> {
    let local = ClusterMember::client(
        uuid::Uuid::new_v4().to_string(),
        SocketAddr::from(([127, 0, 0, 1], 0)),
    );
    let membership = MembershipService::new(config.cache_service_name.clone(), local);
    for (id, addr) in nodes {
        membership.join(ClusterMember::storage(id, addr));
    }

    let mut invocation =
        HttpInvocationService::new(config.invocation_service_name.clone(), membership.clone());
    if let Some(ms) = timeout_ms {
        invocation = invocation.with_timeout(Duration::from_millis(ms));
    }

    let coordinator: HotKeysCoordinator<u32> =
        HotKeysCoordinator::new(membership, Arc::new(invocation));
    let report = coordinator.fetch_top_n(config).await?;
    print!("{}", report);
    Ok(())
}
