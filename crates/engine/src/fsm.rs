//! The deterministic state machine every node replays identically.
//!
//! `Fsm` is a single-threaded apply dispatcher over [`CommandLogEntry`]: the
//! Raft engine delivers committed entries to it one at a time, in log order,
//! and `apply` is the only place table schemas and items are mutated. Reads
//! (`TableRegistry::get`, `KVStore::get`/`query`) may run concurrently from
//! other threads without going through `apply` at all.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use raftkv_concurrency::TableRegistry;
use raftkv_core::table::TableMeta;
use raftkv_core::{CommandLogEntry, CommandResult, ItemKey, RaftKvResult};
use raftkv_storage::{DeleteOutcome, KVStore, PutOutcome};

/// The in-memory + on-disk state machine for one node.
pub struct Fsm {
    node_id: u64,
    tables: TableRegistry,
    store: Arc<dyn KVStore>,
    last_applied: AtomicU64,
}

/// A point-in-time snapshot of FSM state, for Raft log compaction.
///
/// Item data is not included: it already lives durably in the `KVStore` and
/// is addressed by (table, key), so the snapshot only needs to capture
/// table schemas and the log position it was taken at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsmSnapshot {
    /// Raft log index this snapshot reflects.
    pub last_applied: u64,
    /// Every table schema known at `last_applied`.
    pub tables: BTreeMap<String, TableMeta>,
}

impl Fsm {
    /// Construct an FSM for `node_id` backed by `store`.
    pub fn new(node_id: u64, store: Arc<dyn KVStore>) -> Self {
        Self {
            node_id,
            tables: TableRegistry::new(),
            store,
            last_applied: AtomicU64::new(0),
        }
    }

    /// The table registry, for read paths that don't go through `apply`.
    pub fn tables(&self) -> &TableRegistry {
        &self.tables
    }

    /// The backing store, for local reads that don't go through `apply`.
    pub fn store(&self) -> &Arc<dyn KVStore> {
        &self.store
    }

    /// The Raft log index of the last entry applied.
    pub fn last_applied(&self) -> u64 {
        self.last_applied.load(Ordering::SeqCst)
    }

    /// Apply one committed log entry at `index`, the entry's version for
    /// last-writer-wins purposes.
    #[instrument(skip(self, entry), fields(node_id = self.node_id, index))]
    pub fn apply(&self, index: u64, entry: &CommandLogEntry) -> CommandResult {
        let result = self.apply_inner(index, entry);
        self.last_applied.store(index, Ordering::SeqCst);
        result
    }

    fn apply_inner(&self, index: u64, entry: &CommandLogEntry) -> CommandResult {
        match entry {
            CommandLogEntry::CreateTable { schema } => {
                if self.tables.contains(&schema.name) {
                    return CommandResult::Conflict { table: schema.name.clone() };
                }
                self.tables.create(schema.clone());
                CommandResult::TableCreated
            }
            CommandLogEntry::DeleteTable { table } => {
                let existed = self.tables.drop_table(table);
                if let Err(e) = self.store.drop_table(self.node_id, table) {
                    return CommandResult::Rejected { reason: e.to_string() };
                }
                if existed {
                    CommandResult::TableDeleted
                } else {
                    CommandResult::TableNotFound { table: table.clone() }
                }
            }
            CommandLogEntry::PutItem { table, item } => {
                let Some(schema) = self.tables.get(table) else {
                    return CommandResult::TableNotFound { table: table.clone() };
                };
                let key = match ItemKey::derive(&schema, item) {
                    Ok(k) => k,
                    Err(e) => return CommandResult::Rejected { reason: e.to_string() },
                };
                match self.store.put(self.node_id, table, &key, item.clone(), index) {
                    Ok(PutOutcome::Applied) => CommandResult::ItemPut { version: index },
                    Ok(PutOutcome::SkippedByLww { winning_version }) => {
                        CommandResult::SkippedByLww { winning_version }
                    }
                    Err(e) => CommandResult::Rejected { reason: e.to_string() },
                }
            }
            CommandLogEntry::DeleteItem { table, key_item } => {
                let Some(schema) = self.tables.get(table) else {
                    return CommandResult::TableNotFound { table: table.clone() };
                };
                let key = match ItemKey::derive(&schema, key_item) {
                    Ok(k) => k,
                    Err(e) => return CommandResult::Rejected { reason: e.to_string() },
                };
                match self.store.delete(self.node_id, table, &key, index) {
                    Ok(DeleteOutcome::Applied) => CommandResult::ItemDeleted,
                    Ok(DeleteOutcome::SkippedByLww { winning_version }) => {
                        CommandResult::SkippedByLww { winning_version }
                    }
                    Err(e) => CommandResult::Rejected { reason: e.to_string() },
                }
            }
        }
    }

    /// Capture table schemas and the applied index for Raft snapshotting.
    pub fn snapshot(&self) -> FsmSnapshot {
        FsmSnapshot {
            last_applied: self.last_applied(),
            tables: self.tables.snapshot(),
        }
    }

    /// Restore table schemas and applied index from a snapshot. Item data
    /// is not restored here: each node's `KVStore` is expected to already
    /// hold it, or to receive it separately (see `RaftEngine` snapshot
    /// transfer in `raftkv-raft`).
    pub fn restore(&self, snapshot: FsmSnapshot) -> RaftKvResult<()> {
        self.tables.restore(snapshot.tables);
        self.last_applied.store(snapshot.last_applied, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raftkv_core::AttributeValue;
    use raftkv_storage::FsKvStore;
    use std::collections::BTreeMap as Map;
    use tempfile::tempdir;

    fn new_fsm() -> (Fsm, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store: Arc<dyn KVStore> = Arc::new(FsKvStore::new(dir.path()));
        (Fsm::new(0, store), dir)
    }

    fn item(id: &str) -> raftkv_core::Item {
        let mut attrs = Map::new();
        attrs.insert("id".to_string(), AttributeValue::S(id.to_string()));
        raftkv_core::Item::new(attrs)
    }

    #[test]
    fn create_table_then_put_then_get() {
        let (fsm, _dir) = new_fsm();
        let schema = TableMeta::new("Users", "id", None);
        assert_eq!(
            fsm.apply(1, &CommandLogEntry::CreateTable { schema }),
            CommandResult::TableCreated
        );

        let put = fsm.apply(2, &CommandLogEntry::PutItem { table: "Users".into(), item: item("alice") });
        assert_eq!(put, CommandResult::ItemPut { version: 2 });

        let key = ItemKey::derive(&fsm.tables().get("Users").unwrap(), &item("alice")).unwrap();
        assert_eq!(fsm.store().get(0, "Users", &key).unwrap(), Some(item("alice")));
    }

    #[test]
    fn put_into_unknown_table_is_rejected_as_not_found() {
        let (fsm, _dir) = new_fsm();
        let result = fsm.apply(1, &CommandLogEntry::PutItem { table: "Ghost".into(), item: item("x") });
        assert_eq!(result, CommandResult::TableNotFound { table: "Ghost".into() });
    }

    #[test]
    fn out_of_order_replay_respects_lww_by_index() {
        let (fsm, _dir) = new_fsm();
        fsm.apply(1, &CommandLogEntry::CreateTable { schema: TableMeta::new("Users", "id", None) });
        fsm.apply(5, &CommandLogEntry::PutItem { table: "Users".into(), item: item("alice") });

        // A lower index replayed after a higher one (e.g. a snapshot restore
        // race) must not resurrect stale data.
        let stale = fsm.apply(3, &CommandLogEntry::PutItem { table: "Users".into(), item: item("alice-old") });
        assert_eq!(stale, CommandResult::SkippedByLww { winning_version: 5 });
    }

    #[test]
    fn delete_table_removes_schema_and_items() {
        let (fsm, _dir) = new_fsm();
        fsm.apply(1, &CommandLogEntry::CreateTable { schema: TableMeta::new("Users", "id", None) });
        fsm.apply(2, &CommandLogEntry::PutItem { table: "Users".into(), item: item("alice") });

        assert_eq!(
            fsm.apply(3, &CommandLogEntry::DeleteTable { table: "Users".into() }),
            CommandResult::TableDeleted
        );
        assert!(!fsm.tables().contains("Users"));
        assert_eq!(fsm.store().query(0, "Users", "alice").unwrap(), Vec::new());
    }

    #[test]
    fn snapshot_and_restore_preserve_schemas_and_applied_index() {
        let (fsm, _dir) = new_fsm();
        fsm.apply(1, &CommandLogEntry::CreateTable { schema: TableMeta::new("Users", "id", None) });
        let snap = fsm.snapshot();
        assert_eq!(snap.last_applied, 1);

        let (fsm2, _dir2) = new_fsm();
        fsm2.restore(snap).unwrap();
        assert!(fsm2.tables().contains("Users"));
        assert_eq!(fsm2.last_applied(), 1);
    }

    #[test]
    fn delete_item_on_missing_item_is_still_reported_as_deleted() {
        let (fsm, _dir) = new_fsm();
        fsm.apply(1, &CommandLogEntry::CreateTable { schema: TableMeta::new("Users", "id", None) });
        let result = fsm.apply(2, &CommandLogEntry::DeleteItem { table: "Users".into(), key_item: item("ghost") });
        assert_eq!(result, CommandResult::ItemDeleted);
    }

    #[test]
    fn create_table_twice_is_a_conflict() {
        let (fsm, _dir) = new_fsm();
        fsm.apply(1, &CommandLogEntry::CreateTable { schema: TableMeta::new("Users", "id", None) });
        let result = fsm.apply(2, &CommandLogEntry::CreateTable { schema: TableMeta::new("Users", "email", None) });
        assert_eq!(result, CommandResult::Conflict { table: "Users".into() });

        // The original schema must survive untouched.
        let schema = fsm.tables().get("Users").unwrap();
        assert_eq!(schema.partition_key, "id");
    }
}
