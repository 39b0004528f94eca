//! Node configuration and cluster addressing.

use std::path::PathBuf;

/// Configuration for one node's process.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// This node's id (0-based, index into the cluster's peer list).
    pub node_id: u64,
    /// Port the first node (`node_id == 0`) listens on for Raft traffic;
    /// every node's Raft port is `base_port + node_id`, and its HTTP port
    /// is `base_port + node_id + 100`.
    pub base_port: u16,
    /// Root directory for persisted data; this node's own data lives at
    /// `<data_root>/<node_id>/`.
    pub data_root: PathBuf,
    /// Total number of nodes in the cluster.
    pub cluster_size: u64,
    /// Host every node binds to and is reachable at.
    pub host: String,
}

impl NodeConfig {
    /// This node's Raft port: `base_port + node_id`.
    pub fn raft_port(&self) -> u16 {
        self.base_port + self.node_id as u16
    }

    /// This node's HTTP port: `base_port + node_id + 100`.
    pub fn http_port(&self) -> u16 {
        self.base_port + self.node_id as u16 + 100
    }

    /// This node's HTTP address (`host:port`), as peers address it.
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port())
    }

    /// Peer `i`'s HTTP address, for `i` in `0..cluster_size`.
    pub fn peer_http_addr(&self, peer_id: u64) -> String {
        format!("{}:{}", self.host, self.base_port + peer_id as u16 + 100)
    }

    /// This node's private data directory: `<data_root>/<node_id>`.
    pub fn node_data_dir(&self) -> PathBuf {
        self.data_root.join(self.node_id.to_string())
    }
}
