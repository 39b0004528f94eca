//! On-disk path derivation.
//!
//! Persisted layout: `<dataRoot>/<nodeId>/kv/<sanitized table>/<sanitized item key>.json`.
//! Every path component here is sanitized by [`raftkv_core::item::sanitize_table_name`]
//! or already comes sanitized from [`raftkv_core::ItemKey`], so a hostile
//! table or key attribute can never write outside its table directory.

use std::path::{Path, PathBuf};

use raftkv_core::item::sanitize_table_name;
use raftkv_core::ItemKey;

/// Root directory for one node's persisted key-value data:
/// `<dataRoot>/<nodeId>/kv`.
pub fn kv_root(data_root: &Path, node_id: u64) -> PathBuf {
    data_root.join(node_id.to_string()).join("kv")
}

/// Directory holding every item of `table`.
pub fn table_dir(data_root: &Path, node_id: u64, table: &str) -> PathBuf {
    kv_root(data_root, node_id).join(sanitize_table_name(table))
}

/// Path to the persisted record for `key` within `table`.
pub fn item_path(data_root: &Path, node_id: u64, table: &str, key: &ItemKey) -> PathBuf {
    table_dir(data_root, node_id, table).join(format!("{}.json", key.as_str()))
}

/// Temp-file path used while writing `item_path` atomically.
pub fn item_tmp_path(data_root: &Path, node_id: u64, table: &str, key: &ItemKey) -> PathBuf {
    table_dir(data_root, node_id, table).join(format!(".{}.tmp", key.as_str()))
}
