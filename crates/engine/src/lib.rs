//! The replicated state machine (FSM).
//!
//! [`Fsm`] is the single point where committed Raft log entries turn into
//! mutations: table creation/deletion against a
//! [`raftkv_concurrency::TableRegistry`] and item writes against a
//! [`raftkv_storage::KVStore`], with last-writer-wins arbitration keyed on
//! the Raft commit index.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fsm;

pub use fsm::{Fsm, FsmSnapshot};
