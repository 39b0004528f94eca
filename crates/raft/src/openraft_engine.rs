//! [`RaftEngine`] implemented over `openraft::Raft`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use openraft::{BasicNode, Config};

use raftkv_core::{CommandLogEntry, CommandResult, RaftKvError, RaftKvResult};
use raftkv_engine::Fsm;

use crate::engine::RaftEngine;
use crate::network::HttpRaftNetworkFactory;
use crate::storage::{LogStore, StateMachineStore};
use crate::type_config::Raft;

/// Time a `propose` call waits for commit before returning
/// `RaftKvError::Timeout`.
const PROPOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// A cluster member backed by `openraft`.
pub struct OpenRaftEngine {
    node_id: u64,
    raft: Raft,
    fsm: Arc<Fsm>,
}

impl OpenRaftEngine {
    /// Start the Raft runtime for `node_id`, wired to `fsm`.
    pub async fn start(node_id: u64, fsm: Arc<Fsm>) -> RaftKvResult<Self> {
        let config = Arc::new(Config::default().validate().map_err(|e| RaftKvError::raft(e.to_string()))?);
        let log_store = LogStore::new();
        let state_machine = StateMachineStore::new(fsm.clone());
        let network = HttpRaftNetworkFactory::new();

        let raft = Raft::new(node_id, config, network, log_store, state_machine)
            .await
            .map_err(|e| RaftKvError::raft(e.to_string()))?;

        Ok(Self { node_id, raft, fsm })
    }
}

#[async_trait]
impl RaftEngine for OpenRaftEngine {
    fn node_id(&self) -> u64 {
        self.node_id
    }

    async fn propose(&self, command: CommandLogEntry) -> RaftKvResult<CommandResult> {
        let outcome = tokio::time::timeout(PROPOSE_TIMEOUT, self.raft.client_write(command))
            .await
            .map_err(|_| RaftKvError::Timeout)?
            .map_err(|e| match e {
                openraft::error::RaftError::APIError(api_err) => {
                    raft_client_write_error(api_err)
                }
                openraft::error::RaftError::Fatal(f) => RaftKvError::raft(f.to_string()),
            })?;
        Ok(outcome.data)
    }

    fn is_leader(&self) -> bool {
        let metrics = self.raft.metrics().borrow().clone();
        metrics.current_leader == Some(self.node_id)
    }

    fn current_leader(&self) -> Option<(u64, Option<String>)> {
        let metrics = self.raft.metrics().borrow().clone();
        let leader_id = metrics.current_leader?;
        let addr = metrics
            .membership_config
            .nodes()
            .find(|(id, _)| **id == leader_id)
            .map(|(_, node)| node.addr.clone());
        Some((leader_id, addr))
    }

    fn current_term(&self) -> u64 {
        self.raft.metrics().borrow().current_term
    }

    fn role_name(&self) -> String {
        let metrics = self.raft.metrics().borrow().clone();
        match metrics.state {
            openraft::ServerState::Leader => "leader",
            openraft::ServerState::Candidate => "candidate",
            openraft::ServerState::Follower => "follower",
            openraft::ServerState::Learner => "learner",
            openraft::ServerState::Shutdown => "shutdown",
        }
        .to_string()
    }

    async fn initialize(&self, members: BTreeMap<u64, String>) -> RaftKvResult<()> {
        let nodes: BTreeMap<u64, BasicNode> = members
            .into_iter()
            .map(|(id, addr)| (id, BasicNode::new(addr)))
            .collect();
        self.raft
            .initialize(nodes)
            .await
            .map_err(|e| RaftKvError::raft(e.to_string()))
    }

    async fn add_voter(&self, node_id: u64, addr: String) -> RaftKvResult<()> {
        self.raft
            .add_learner(node_id, BasicNode::new(addr), true)
            .await
            .map_err(|e| RaftKvError::raft(e.to_string()))?;

        let mut members: BTreeSet<u64> = self
            .raft
            .metrics()
            .borrow()
            .membership_config
            .voter_ids()
            .collect();
        members.insert(node_id);

        self.raft
            .change_membership(members, false)
            .await
            .map_err(|e| RaftKvError::raft(e.to_string()))?;
        Ok(())
    }
}

impl OpenRaftEngine {
    /// The FSM this engine drives, for local (non-Raft) reads.
    pub fn fsm(&self) -> &Arc<Fsm> {
        &self.fsm
    }

    /// A cheap clone of the underlying `openraft::Raft` handle, for wiring
    /// up the Raft-internal HTTP routes.
    pub fn raft_handle(&self) -> Raft {
        self.raft.clone()
    }
}

fn raft_client_write_error(
    err: openraft::error::ClientWriteError<u64, BasicNode>,
) -> RaftKvError {
    use openraft::error::ClientWriteError;
    match err {
        ClientWriteError::ForwardToLeader(fwd) => RaftKvError::not_leader(
            fwd.leader_id,
            fwd.leader_node.map(|n| n.addr),
        ),
        ClientWriteError::ChangeMembershipError(e) => RaftKvError::raft(e.to_string()),
    }
}
