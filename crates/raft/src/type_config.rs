//! The `openraft` type configuration for this cluster.
//!
//! `D` is the replicated command, `R` is the FSM's response to it — both
//! come straight from `raftkv-core` so the Raft layer never needs its own
//! copy of the command union.

use std::io::Cursor;

use openraft::{BasicNode, TokioRuntime};
use raftkv_core::{CommandLogEntry, CommandResult};

openraft::declare_raft_types!(
    /// Raft type configuration for a raftkv cluster.
    pub TypeConfig:
        D = CommandLogEntry,
        R = CommandResult,
        NodeId = u64,
        Node = BasicNode,
        Entry = openraft::Entry<TypeConfig>,
        SnapshotData = Cursor<Vec<u8>>,
        AsyncRuntime = TokioRuntime,
);

/// Shorthand for this cluster's `openraft::Raft`.
pub type Raft = openraft::Raft<TypeConfig>;
