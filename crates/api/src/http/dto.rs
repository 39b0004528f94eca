//! Request/response shapes for the client-facing HTTP API.
//!
//! These mirror the endpoint table exactly: wire format is the contract,
//! not an implementation detail, so every field name here is load-bearing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use raftkv_core::{AttributeValue, Item};

/// `POST /create-table` request body.
#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    /// Table name.
    pub table: String,
    /// Partition key attribute name.
    pub partition_key: String,
    /// Sort key attribute name, if any.
    #[serde(default)]
    pub sort_key: Option<String>,
}

/// `POST /delete-table` request body.
#[derive(Debug, Deserialize)]
pub struct DeleteTableRequest {
    /// Table name.
    pub table: String,
}

/// `POST /put-item` request body.
#[derive(Debug, Deserialize)]
pub struct PutItemRequest {
    /// Target table.
    pub table: String,
    /// Item attributes.
    pub item: BTreeMap<String, AttributeValue>,
}

/// `POST /get-item` request body.
#[derive(Debug, Deserialize)]
pub struct GetItemRequest {
    /// Target table.
    pub table: String,
    /// Key attributes identifying the item.
    pub key: BTreeMap<String, AttributeValue>,
}

/// `POST /delete-item` request body.
#[derive(Debug, Deserialize)]
pub struct DeleteItemRequest {
    /// Target table.
    pub table: String,
    /// Key attributes identifying the item.
    pub key: BTreeMap<String, AttributeValue>,
}

/// `POST /query-items` request body.
#[derive(Debug, Deserialize)]
pub struct QueryItemsRequest {
    /// Target table.
    pub table: String,
    /// Partition key attribute (only the partition key is required).
    pub partition_key: BTreeMap<String, AttributeValue>,
}

/// Generic write response: `{"status": "ok", ...}` or a skipped-write marker.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteResponse {
    /// The write was applied.
    Ok {
        /// Commit index for put/delete, omitted for table operations.
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<u64>,
    },
    /// The write lost a last-writer-wins race.
    SkippedByLww {
        /// Version of the value that won instead.
        winning_version: u64,
    },
}

/// `GET /get-item` response.
#[derive(Debug, Serialize)]
pub struct GetItemResponse {
    /// The item, or `null` if not found.
    pub item: Option<Item>,
}

/// `GET /query-items` response.
#[derive(Debug, Serialize)]
pub struct QueryItemsResponse {
    /// Every item sharing the queried partition key.
    pub items: Vec<Item>,
}

/// `GET /status` response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// This node's id.
    pub node_id: u64,
    /// `"leader"`, `"follower"`, `"candidate"`, or `"learner"`.
    pub state: String,
    /// Current Raft term.
    pub term: u64,
    /// True if this node is currently the leader.
    pub is_leader: bool,
    /// Known leader's node id, if any.
    pub leader_id: Option<u64>,
    /// Known leader's HTTP address, if any.
    pub leader_addr: Option<String>,
    /// Table names known to this node.
    pub tables: Vec<String>,
}

/// Uniform error body for non-2xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Short machine-readable error kind (`"not_leader"`, `"not_found"`, ...).
    pub error: String,
    /// Human-readable detail.
    pub message: String,
    /// Leader address to retry against, populated only for `not_leader`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_addr: Option<String>,
}

pub(crate) fn item_from_attrs(attrs: BTreeMap<String, AttributeValue>) -> Item {
    Item::new(attrs)
}
