//! Internal node-to-node endpoints `openraft` calls through
//! [`raftkv_raft::network::HttpRaftNetwork`]. Not part of the client-facing
//! surface and not subject to the leader-only write policy.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use raftkv_raft::type_config::Raft;

/// Shared state for Raft-internal handlers.
#[derive(Clone)]
pub struct RaftApiState {
    /// The local `openraft::Raft` instance.
    pub raft: Arc<Raft>,
}

/// `POST /raft/append-entries`
pub async fn append_entries(
    State(state): State<RaftApiState>,
    Json(req): Json<openraft::raft::AppendEntriesRequest<raftkv_raft::TypeConfig>>,
) -> Response {
    match state.raft.append_entries(req).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// `POST /raft/vote`
pub async fn vote(
    State(state): State<RaftApiState>,
    Json(req): Json<openraft::raft::VoteRequest<u64>>,
) -> Response {
    match state.raft.vote(req).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// `POST /raft/install-snapshot`
pub async fn install_snapshot(
    State(state): State<RaftApiState>,
    Json(req): Json<openraft::raft::InstallSnapshotRequest<raftkv_raft::TypeConfig>>,
) -> Response {
    match state.raft.install_snapshot(req).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
