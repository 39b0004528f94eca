//! Value types returned across the `NodeFacade` boundary.

use serde::{Deserialize, Serialize};

/// The outcome of a successful proposed write, after the FSM has applied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WriteOutcome {
    /// A table was created.
    TableCreated,
    /// A table was deleted.
    TableDeleted,
    /// An item was written at `version`.
    ItemPut {
        /// Raft commit index the item landed at.
        version: u64,
    },
    /// An item was deleted.
    ItemDeleted,
    /// The write lost a last-writer-wins race.
    SkippedByLww {
        /// Version of the value that won instead.
        winning_version: u64,
    },
}

/// Snapshot of node identity and Raft role, backing `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStats {
    /// This node's id.
    pub node_id: u64,
    /// `"leader"`, `"follower"`, or `"candidate"`.
    pub state: String,
    /// Current Raft term.
    pub term: u64,
    /// True if this node is currently the leader.
    pub is_leader: bool,
    /// Known leader's node id, if any.
    pub leader_id: Option<u64>,
    /// Known leader's HTTP address, if any.
    pub leader_addr: Option<String>,
    /// Table names known to this node's FSM.
    pub tables: Vec<String>,
}
