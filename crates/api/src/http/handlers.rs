//! Axum handlers for the client-facing API.
//!
//! Writes are rejected locally, before ever reaching `RaftEngine::propose`,
//! when this node does not believe itself to be the leader — the facade
//! would reject them anyway once the proposal hit the engine, but checking
//! up front avoids paying for a doomed round trip and lets us return the
//! known leader's address for the client to retry against.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use raftkv_core::{table::TableMeta, RaftKvError};

use crate::facade::types::WriteOutcome;
use crate::facade::NodeFacade;
use crate::http::dto::*;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ApiState {
    /// The node-local facade handlers drive.
    pub facade: Arc<dyn NodeFacade>,
}

fn write_response(outcome: WriteOutcome) -> Response {
    match outcome {
        WriteOutcome::TableCreated | WriteOutcome::TableDeleted | WriteOutcome::ItemDeleted => {
            (StatusCode::OK, Json(WriteResponse::Ok { version: None })).into_response()
        }
        WriteOutcome::ItemPut { version } => {
            (StatusCode::OK, Json(WriteResponse::Ok { version: Some(version) })).into_response()
        }
        WriteOutcome::SkippedByLww { winning_version } => {
            (StatusCode::OK, Json(WriteResponse::SkippedByLww { winning_version })).into_response()
        }
    }
}

fn error_response(err: RaftKvError) -> Response {
    let (status, kind) = match &err {
        RaftKvError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
        RaftKvError::NotLeader { .. } => (StatusCode::MISDIRECTED_REQUEST, "not_leader"),
        RaftKvError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
        RaftKvError::LeadershipLost => (StatusCode::SERVICE_UNAVAILABLE, "leadership_lost"),
        RaftKvError::TableNotFound(_) | RaftKvError::ItemNotFound => (StatusCode::NOT_FOUND, "not_found"),
        RaftKvError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        RaftKvError::SkippedByLww { .. } => (StatusCode::OK, "skipped_by_lww"),
        RaftKvError::Storage(_) | RaftKvError::Raft(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    };
    let leader_addr = match &err {
        RaftKvError::NotLeader { leader_addr, .. } => leader_addr.clone(),
        _ => None,
    };
    (status, Json(ErrorResponse { error: kind.to_string(), message: err.to_string(), leader_addr })).into_response()
}

/// Reject the request locally if this node is not the leader, saving a
/// doomed proposal round trip.
fn require_leader(state: &ApiState) -> Result<(), Response> {
    if state.facade.is_leader() {
        return Ok(());
    }
    let (leader_id, leader_addr) = state.facade.leader_info().unzip();
    Err(error_response(RaftKvError::not_leader(leader_id, leader_addr.flatten())))
}

/// `POST /create-table`
pub async fn create_table(State(state): State<ApiState>, Json(req): Json<CreateTableRequest>) -> Response {
    if let Err(resp) = require_leader(&state) {
        return resp;
    }
    let schema = TableMeta::new(req.table, req.partition_key, req.sort_key);
    match state.facade.propose_create_table(schema).await {
        Ok(outcome) => write_response(outcome),
        Err(e) => error_response(e),
    }
}

/// `POST /delete-table`
pub async fn delete_table(State(state): State<ApiState>, Json(req): Json<DeleteTableRequest>) -> Response {
    if let Err(resp) = require_leader(&state) {
        return resp;
    }
    match state.facade.propose_delete_table(req.table).await {
        Ok(outcome) => write_response(outcome),
        Err(e) => error_response(e),
    }
}

/// `POST /put-item`
pub async fn put_item(State(state): State<ApiState>, Json(req): Json<PutItemRequest>) -> Response {
    if let Err(resp) = require_leader(&state) {
        return resp;
    }
    let item = item_from_attrs(req.item);
    match state.facade.propose_put_item(req.table, item).await {
        Ok(outcome) => write_response(outcome),
        Err(e) => error_response(e),
    }
}

/// `POST /delete-item`
pub async fn delete_item(State(state): State<ApiState>, Json(req): Json<DeleteItemRequest>) -> Response {
    if let Err(resp) = require_leader(&state) {
        return resp;
    }
    let key_item = item_from_attrs(req.key);
    match state.facade.propose_delete_item(req.table, key_item).await {
        Ok(outcome) => write_response(outcome),
        Err(e) => error_response(e),
    }
}

/// `POST /get-item` — a local, eventually-consistent read; any node
/// answers, not only the leader.
pub async fn get_item(State(state): State<ApiState>, Json(req): Json<GetItemRequest>) -> Response {
    let key_item = item_from_attrs(req.key);
    match state.facade.local_get(&req.table, &key_item) {
        Ok(item) => (StatusCode::OK, Json(GetItemResponse { item })).into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /query-items` — local read, any node answers.
pub async fn query_items(State(state): State<ApiState>, Json(req): Json<QueryItemsRequest>) -> Response {
    let partition_item = item_from_attrs(req.partition_key);
    match state.facade.local_query(&req.table, &partition_item) {
        Ok(items) => (StatusCode::OK, Json(QueryItemsResponse { items })).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /status`
pub async fn status(State(state): State<ApiState>) -> Response {
    let stats = state.facade.stats();
    (
        StatusCode::OK,
        Json(StatusResponse {
            node_id: stats.node_id,
            state: stats.state,
            term: stats.term,
            is_leader: stats.is_leader,
            leader_id: stats.leader_id,
            leader_addr: stats.leader_addr,
            tables: stats.tables,
        }),
    )
        .into_response()
}

/// `GET /healthz` — liveness only, no Raft semantics.
pub async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}
