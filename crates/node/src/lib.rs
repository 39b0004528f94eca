//! Process-level wiring: build every layer for one node and serve it.

#![warn(clippy::all)]

pub mod bootstrap;
pub mod config;

use std::sync::Arc;

use tracing::info;

use raftkv_api::http::{build_router, ApiState, RaftApiState};
use raftkv_api::NodeFacadeImpl;
use raftkv_core::RaftKvResult;
use raftkv_engine::Fsm;
use raftkv_raft::OpenRaftEngine;
use raftkv_storage::FsKvStore;

pub use config::NodeConfig;

/// Build every layer for `config` and serve the node's HTTP API until the
/// process is killed. Node 0 additionally bootstraps the cluster once its
/// Raft runtime is up.
pub async fn run_node(config: NodeConfig) -> RaftKvResult<()> {
    std::fs::create_dir_all(config.node_data_dir())?;

    let store = Arc::new(FsKvStore::new(config.node_data_dir().join("kv")));
    let fsm = Arc::new(Fsm::new(config.node_id, store));

    let engine = Arc::new(OpenRaftEngine::start(config.node_id, fsm.clone()).await?);
    let facade = Arc::new(NodeFacadeImpl::new(engine.clone(), fsm.clone()));

    let api_state = ApiState { facade: facade.clone() };
    let raft_state = RaftApiState { raft: Arc::new(engine_raft_handle(&engine)) };
    let router = build_router(api_state, raft_state);

    let http_addr = format!("{}:{}", config.host, config.http_port());
    info!(node_id = config.node_id, %http_addr, "starting node");

    let listener = tokio::net::TcpListener::bind(&http_addr).await?;

    if config.node_id == 0 {
        let config = config.clone();
        let engine = engine.clone();
        tokio::spawn(async move {
            if let Err(e) = bootstrap::bootstrap_cluster(&config, engine.as_ref()).await {
                tracing::error!(error = %e, "cluster bootstrap failed");
            }
        });
    }

    axum::serve(listener, router)
        .await
        .map_err(|e| raftkv_core::RaftKvError::storage(e.to_string()))?;

    Ok(())
}

/// `OpenRaftEngine` owns the `openraft::Raft` handle needed by the
/// Raft-internal HTTP routes; this extracts a cheap clone of it.
fn engine_raft_handle(engine: &Arc<OpenRaftEngine>) -> raftkv_raft::type_config::Raft {
    engine.raft_handle()
}
