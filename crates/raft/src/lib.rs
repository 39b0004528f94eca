//! Raft integration: the `RaftEngine` boundary and its `openraft`-backed
//! implementation.
//!
//! This is the only crate in the workspace that depends on `openraft`
//! directly. `raftkv-api` and `raftkv-node` program against
//! [`RaftEngine`] so the consensus library could be swapped without
//! touching the HTTP or CLI surface.

#![warn(clippy::all)]

pub mod engine;
pub mod network;
pub mod openraft_engine;
pub mod storage;
pub mod type_config;

pub use engine::RaftEngine;
pub use openraft_engine::OpenRaftEngine;
pub use type_config::TypeConfig;
