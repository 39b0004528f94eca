//! The `KVStore` trait and its filesystem-backed implementation.
//!
//! `FsKvStore` owns last-writer-wins arbitration: every write compares the
//! proposed version against whatever is already on disk and silently drops
//! writes that lose the race, so the FSM's apply path never has to re-read
//! state to decide.

use std::path::{Path, PathBuf};

use tracing::instrument;

use raftkv_core::{Item, ItemKey, RaftKvResult};

use crate::path::{item_path, item_tmp_path, table_dir};
use crate::record::{read_record, remove_record, write_record_atomic, KVStoreRecord};

/// Outcome of a [`KVStore::put`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// The write was applied.
    Applied,
    /// The write lost a last-writer-wins race; this is the version that
    /// is on disk instead.
    SkippedByLww { winning_version: u64 },
}

/// Outcome of a [`KVStore::delete`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The item's file was removed (or was already absent).
    Applied,
    /// The delete lost a last-writer-wins race.
    SkippedByLww { winning_version: u64 },
}

/// Durable per-item storage for one node.
///
/// Every method is scoped to a single node's data directory; callers pass
/// `node_id` so one `FsKvStore` can, in tests, stand in for several nodes
/// sharing a temp directory root.
pub trait KVStore: Send + Sync {
    /// Write `item` under `key` in `table` at `version`, honoring LWW.
    fn put(&self, node_id: u64, table: &str, key: &ItemKey, item: Item, version: u64) -> RaftKvResult<PutOutcome>;

    /// Read the item at `key` in `table`, if any (`None` if absent or deleted).
    fn get(&self, node_id: u64, table: &str, key: &ItemKey) -> RaftKvResult<Option<Item>>;

    /// Delete the item at `key` in `table` at `version`, honoring LWW.
    fn delete(&self, node_id: u64, table: &str, key: &ItemKey, version: u64) -> RaftKvResult<DeleteOutcome>;

    /// Return every live item in `table` whose key starts with `key_prefix`
    /// (the sanitized partition key, used to find all sort-key rows under
    /// one partition).
    fn query(&self, node_id: u64, table: &str, key_prefix: &str) -> RaftKvResult<Vec<Item>>;

    /// Remove every persisted item belonging to `table`.
    fn drop_table(&self, node_id: u64, table: &str) -> RaftKvResult<()>;
}

/// A [`KVStore`] backed by one JSON file per item under `data_root`.
#[derive(Debug, Clone)]
pub struct FsKvStore {
    data_root: PathBuf,
}

impl FsKvStore {
    /// Construct a store rooted at `data_root`.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self { data_root: data_root.into() }
    }

    fn root(&self) -> &Path {
        &self.data_root
    }
}

impl KVStore for FsKvStore {
    #[instrument(skip(self, item), fields(table, key = key.as_str(), version))]
    fn put(&self, node_id: u64, table: &str, key: &ItemKey, item: Item, version: u64) -> RaftKvResult<PutOutcome> {
        let path = item_path(self.root(), node_id, table, key);
        if let Some(existing) = read_record(&path)? {
            if existing.version >= version {
                return Ok(PutOutcome::SkippedByLww { winning_version: existing.version });
            }
        }
        let tmp = item_tmp_path(self.root(), node_id, table, key);
        write_record_atomic(&path, &tmp, &KVStoreRecord::new(version, item))?;
        Ok(PutOutcome::Applied)
    }

    fn get(&self, node_id: u64, table: &str, key: &ItemKey) -> RaftKvResult<Option<Item>> {
        let path = item_path(self.root(), node_id, table, key);
        Ok(read_record(&path)?.map(|r| r.item))
    }

    #[instrument(skip(self), fields(table, key = key.as_str(), version))]
    fn delete(&self, node_id: u64, table: &str, key: &ItemKey, version: u64) -> RaftKvResult<DeleteOutcome> {
        let path = item_path(self.root(), node_id, table, key);
        if let Some(existing) = read_record(&path)? {
            if existing.version >= version {
                return Ok(DeleteOutcome::SkippedByLww { winning_version: existing.version });
            }
        }
        remove_record(&path)?;
        Ok(DeleteOutcome::Applied)
    }

    fn query(&self, node_id: u64, table: &str, key_prefix: &str) -> RaftKvResult<Vec<Item>> {
        let dir = table_dir(self.root(), node_id, table);
        let entries = match std::fs::read_dir(&dir) {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut results = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let Some(stem) = name.strip_suffix(".json") else { continue };
            if stem.starts_with('.') {
                continue; // in-flight temp file
            }
            if !(stem == key_prefix || stem.starts_with(&format!("{}_", key_prefix))) {
                continue;
            }
            if let Some(record) = read_record(&entry.path())? {
                results.push(record.item);
            }
        }
        Ok(results)
    }

    #[instrument(skip(self), fields(table))]
    fn drop_table(&self, node_id: u64, table: &str) -> RaftKvResult<()> {
        let dir = table_dir(self.root(), node_id, table);
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
