//! The narrow boundary every higher layer programs against.
//!
//! `NodeFacade` (in `raftkv-api`) never touches `openraft` directly — it
//! only knows `RaftEngine`. That keeps the `openraft` dependency, and any
//! future replacement of it, contained to this crate.

use std::collections::BTreeMap;

use async_trait::async_trait;

use raftkv_core::{CommandLogEntry, CommandResult, RaftKvResult};

/// What a Raft-replicated log gives the rest of the system: a way to
/// propose commands and learn about cluster/leadership state.
#[async_trait]
pub trait RaftEngine: Send + Sync {
    /// This node's id.
    fn node_id(&self) -> u64;

    /// Replicate `command`, returning the FSM's result once committed.
    ///
    /// Returns `RaftKvError::NotLeader` if this node is not currently the
    /// leader, `RaftKvError::Timeout` if commit does not happen within the
    /// engine's deadline, and `RaftKvError::LeadershipLost` if leadership
    /// changed mid-flight.
    async fn propose(&self, command: CommandLogEntry) -> RaftKvResult<CommandResult>;

    /// True if this node currently believes it is the Raft leader.
    fn is_leader(&self) -> bool;

    /// The current known leader's (node id, HTTP address), if any.
    fn current_leader(&self) -> Option<(u64, Option<String>)>;

    /// The current Raft term, for `/status`.
    fn current_term(&self) -> u64;

    /// This node's current role: `"leader"`, `"follower"`, `"candidate"`,
    /// or `"learner"`.
    fn role_name(&self) -> String;

    /// Bootstrap a brand-new single-node cluster with `members` as the
    /// initial voter set (node id -> HTTP address). Called once, by node 0.
    async fn initialize(&self, members: BTreeMap<u64, String>) -> RaftKvResult<()>;

    /// Add `node_id` at `addr` as a learner, then promote it to a voter.
    /// Called by the leader when a new node joins the cluster.
    async fn add_voter(&self, node_id: u64, addr: String) -> RaftKvResult<()>;
}
