//! Builds the Axum `Router` combining the client-facing API, the internal
//! Raft transport, and liveness.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::http::handlers::{self, ApiState};
use crate::http::raft_routes::{self, RaftApiState};

/// Build the full router for one node.
pub fn build_router(api_state: ApiState, raft_state: RaftApiState) -> Router {
    let client_routes = Router::new()
        .route("/create-table", post(handlers::create_table))
        .route("/delete-table", post(handlers::delete_table))
        .route("/put-item", post(handlers::put_item))
        .route("/get-item", post(handlers::get_item))
        .route("/delete-item", post(handlers::delete_item))
        .route("/query-items", post(handlers::query_items))
        .route("/status", get(handlers::status))
        .route("/healthz", get(handlers::healthz))
        .with_state(api_state);

    let raft_routes = Router::new()
        .route("/raft/append-entries", post(raft_routes::append_entries))
        .route("/raft/vote", post(raft_routes::vote))
        .route("/raft/install-snapshot", post(raft_routes::install_snapshot))
        .with_state(raft_state);

    client_routes.merge(raft_routes).layer(TraceLayer::new_for_http())
}
