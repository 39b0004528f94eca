//! Shared, lock-guarded table-schema state.
//!
//! The FSM is the single writer of table schemas; HTTP handlers and the
//! Raft leader-check path read concurrently. [`TableRegistry`] wraps a
//! `parking_lot::RwLock` the way the teacher's concurrency crate wraps its
//! transaction tables, scaled down from branch-scoped locking to a single
//! flat map since this store has no transactions to isolate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod table_registry;

pub use table_registry::TableRegistry;
