//! The client-facing and Raft-internal HTTP surfaces.

pub mod dto;
pub mod handlers;
pub mod raft_routes;
pub mod router;

pub use handlers::ApiState;
pub use raft_routes::RaftApiState;
pub use router::build_router;
