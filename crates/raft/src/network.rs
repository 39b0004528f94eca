//! HTTP transport for inter-node Raft RPCs.
//!
//! Every node exposes `/raft/append-entries`, `/raft/vote`, and
//! `/raft/install-snapshot` (wired up in `raftkv-api`); this is the client
//! side that `openraft` calls when it needs to reach a peer.

use openraft::error::{InstallSnapshotError, RPCError, RaftError};
use openraft::network::{RaftNetwork, RaftNetworkFactory};
use openraft::raft::{
    AppendEntriesRequest, AppendEntriesResponse, InstallSnapshotRequest, InstallSnapshotResponse, VoteRequest,
    VoteResponse,
};
use openraft::BasicNode;

use crate::type_config::TypeConfig;

/// Builds a [`HttpRaftNetwork`] per target node.
#[derive(Clone, Default)]
pub struct HttpRaftNetworkFactory {
    client: reqwest::Client,
}

impl HttpRaftNetworkFactory {
    /// Construct a factory sharing one `reqwest::Client` across peers.
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl RaftNetworkFactory<TypeConfig> for HttpRaftNetworkFactory {
    type Network = HttpRaftNetwork;

    async fn new_client(&mut self, _target: u64, node: &BasicNode) -> Self::Network {
        HttpRaftNetwork {
            client: self.client.clone(),
            addr: node.addr.clone(),
        }
    }
}

/// A Raft RPC client bound to one peer's HTTP address.
pub struct HttpRaftNetwork {
    client: reqwest::Client,
    addr: String,
}

impl HttpRaftNetwork {
    async fn post<Req: serde::Serialize, Resp: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, reqwest::Error> {
        self.client
            .post(format!("http://{}{}", self.addr, path))
            .json(body)
            .send()
            .await?
            .json()
            .await
    }
}

impl RaftNetwork<TypeConfig> for HttpRaftNetwork {
    async fn append_entries(
        &mut self,
        req: AppendEntriesRequest<TypeConfig>,
        _option: openraft::network::RPCOption,
    ) -> Result<AppendEntriesResponse<u64>, RPCError<u64, BasicNode, RaftError<u64>>> {
        self.post("/raft/append-entries", &req)
            .await
            .map_err(|e| RPCError::Network(openraft::error::NetworkError::new(&e)))
    }

    async fn install_snapshot(
        &mut self,
        req: InstallSnapshotRequest<TypeConfig>,
        _option: openraft::network::RPCOption,
    ) -> Result<InstallSnapshotResponse<u64>, RPCError<u64, BasicNode, RaftError<u64, InstallSnapshotError>>> {
        self.post("/raft/install-snapshot", &req)
            .await
            .map_err(|e| RPCError::Network(openraft::error::NetworkError::new(&e)))
    }

    async fn vote(
        &mut self,
        req: VoteRequest<u64>,
        _option: openraft::network::RPCOption,
    ) -> Result<VoteResponse<u64>, RPCError<u64, BasicNode, RaftError<u64>>> {
        self.post("/raft/vote", &req)
            .await
            .map_err(|e| RPCError::Network(openraft::error::NetworkError::new(&e)))
    }
}
