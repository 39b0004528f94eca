//! A thin HTTP client against one node's client-facing API.

use std::collections::BTreeMap;

use raftkv_core::AttributeValue;
use serde_json::{json, Value};

/// Error talking to a node: either the transport failed, or the node
/// answered with a non-2xx status carrying a JSON error body.
#[derive(Debug)]
pub enum ClientError {
    /// Could not reach the node at all.
    Transport(String),
    /// The node rejected the request; `body` is its JSON error response.
    Api { status: u16, body: Value },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "could not reach node: {}", e),
            ClientError::Api { status, body } => write!(f, "node returned {}: {}", status, body),
        }
    }
}

/// A client bound to one node's HTTP address.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Construct a client targeting `target_addr` (`host:port`).
    pub fn new(target_addr: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("http://{}", target_addr),
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = resp.status();
        let body: Value = resp.json().await.map_err(|e| ClientError::Transport(e.to_string()))?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::Api { status: status.as_u16(), body })
        }
    }

    async fn get(&self, path: &str) -> Result<Value, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = resp.status();
        let body: Value = resp.json().await.map_err(|e| ClientError::Transport(e.to_string()))?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::Api { status: status.as_u16(), body })
        }
    }

    /// `POST /create-table`
    pub async fn create_table(&self, table: &str, partition_key: &str, sort_key: Option<&str>) -> Result<Value, ClientError> {
        self.post(
            "/create-table",
            json!({ "table": table, "partition_key": partition_key, "sort_key": sort_key }),
        )
        .await
    }

    /// `POST /delete-table`
    pub async fn delete_table(&self, table: &str) -> Result<Value, ClientError> {
        self.post("/delete-table", json!({ "table": table })).await
    }

    /// `POST /put-item`
    pub async fn put_item(&self, table: &str, item: BTreeMap<String, AttributeValue>) -> Result<Value, ClientError> {
        self.post("/put-item", json!({ "table": table, "item": item })).await
    }

    /// `POST /get-item`
    pub async fn get_item(&self, table: &str, key: BTreeMap<String, AttributeValue>) -> Result<Value, ClientError> {
        self.post("/get-item", json!({ "table": table, "key": key })).await
    }

    /// `POST /delete-item`
    pub async fn delete_item(&self, table: &str, key: BTreeMap<String, AttributeValue>) -> Result<Value, ClientError> {
        self.post("/delete-item", json!({ "table": table, "key": key })).await
    }

    /// `POST /query-items`
    pub async fn query_items(&self, table: &str, partition_key: BTreeMap<String, AttributeValue>) -> Result<Value, ClientError> {
        self.post("/query-items", json!({ "table": table, "partition_key": partition_key }))
            .await
    }

    /// `GET /status`
    pub async fn status(&self) -> Result<Value, ClientError> {
        self.get("/status").await
    }
}
