//! Cluster bootstrap: node 0 initializes a single-node Raft group on itself,
//! waits to become leader, then adds every other configured node as a
//! voter. Nodes 1..N-1 do nothing here — they come up as bare Raft members
//! and are pulled into the cluster by node 0's `add_voter` calls.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::info;

use raftkv_core::RaftKvResult;
use raftkv_raft::RaftEngine;

use crate::config::NodeConfig;

/// Poll interval while waiting for this node to observe itself as leader
/// after `initialize`.
const LEADER_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Upper bound on how long to wait for leadership before giving up.
const LEADER_POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Run cluster bootstrap for `config.node_id`. A no-op on every node except
/// node 0.
pub async fn bootstrap_cluster(config: &NodeConfig, engine: &dyn RaftEngine) -> RaftKvResult<()> {
    if config.node_id != 0 {
        return Ok(());
    }

    info!(node_id = config.node_id, "bootstrapping cluster");
    let mut members = BTreeMap::new();
    members.insert(0, config.http_addr());
    engine.initialize(members).await?;

    wait_for_leadership(engine).await?;

    for peer_id in 1..config.cluster_size {
        let addr = config.peer_http_addr(peer_id);
        info!(peer_id, %addr, "adding voter");
        engine.add_voter(peer_id, addr).await?;
    }

    Ok(())
}

async fn wait_for_leadership(engine: &dyn RaftEngine) -> RaftKvResult<()> {
    let deadline = tokio::time::Instant::now() + LEADER_POLL_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if engine.is_leader() {
            return Ok(());
        }
        tokio::time::sleep(LEADER_POLL_INTERVAL).await;
    }
    Err(raftkv_core::RaftKvError::raft("timed out waiting to become leader after initialize"))
}
