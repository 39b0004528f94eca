//! The set of tables known to a node's state machine.
//!
//! Table creation/deletion and item writes all go through the single-writer
//! FSM, but reads (local gets, queries, `/status`) happen concurrently from
//! HTTP handler tasks. `TableRegistry` is the `parking_lot::RwLock`-guarded
//! map that makes that safe: writers take the exclusive lock only for the
//! brief moment it takes to insert or remove a schema, readers never block
//! each other.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use raftkv_core::table::TableMeta;

/// Shared, thread-safe registry of table schemas.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    inner: Arc<RwLock<BTreeMap<String, TableMeta>>>,
}

impl TableRegistry {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema`, overwriting any existing schema of the same name.
    pub fn create(&self, schema: TableMeta) {
        self.inner.write().insert(schema.name.clone(), schema);
    }

    /// Remove a table's schema. Returns `true` if it existed.
    pub fn drop_table(&self, table: &str) -> bool {
        self.inner.write().remove(table).is_some()
    }

    /// Look up a table's schema.
    pub fn get(&self, table: &str) -> Option<TableMeta> {
        self.inner.read().get(table).cloned()
    }

    /// True if `table` is registered.
    pub fn contains(&self, table: &str) -> bool {
        self.inner.read().contains_key(table)
    }

    /// Every registered table name, in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.inner.read().keys().cloned().collect()
    }

    /// A snapshot of every schema, for FSM snapshotting.
    pub fn snapshot(&self) -> BTreeMap<String, TableMeta> {
        self.inner.read().clone()
    }

    /// Replace the entire registry contents, for FSM restore.
    pub fn restore(&self, tables: BTreeMap<String, TableMeta>) {
        *self.inner.write() = tables;
    }
}
