//! `openraft` storage glue: an in-memory log plus a bridge from committed
//! entries to [`raftkv_engine::Fsm`].
//!
//! Log storage is a plain `BTreeMap` guarded by a `parking_lot::Mutex` —
//! this simulator never restarts a node mid-test-run, so log durability
//! across process restarts is out of scope (see `raftkv-node`'s bootstrap
//! notes). The state machine side is not in-memory at all: every `apply`
//! call delegates straight to the FSM, whose effects already live durably
//! in the `KVStore`.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

use openraft::storage::{IOFlushed, LogFlushed, LogState, RaftLogStorage, RaftStateMachine, Snapshot};
use openraft::{
    Entry, EntryPayload, LogId, OptionalSend, RaftLogReader, RaftSnapshotBuilder, RaftTypeConfig,
    SnapshotMeta, StorageError, StoredMembership, Vote,
};
use parking_lot::Mutex;

use raftkv_core::CommandResult;
use raftkv_engine::{Fsm, FsmSnapshot};

use crate::type_config::TypeConfig;

/// In-memory Raft log for one node.
#[derive(Clone)]
pub struct LogStore {
    inner: Arc<Mutex<LogStoreInner>>,
}

struct LogStoreInner {
    log: BTreeMap<u64, Entry<TypeConfig>>,
    vote: Option<Vote<u64>>,
    last_purged: Option<LogId<u64>>,
}

impl LogStore {
    /// Construct an empty log store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogStoreInner {
                log: BTreeMap::new(),
                vote: None,
                last_purged: None,
            })),
        }
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RaftLogReader<TypeConfig> for LogStore {
    async fn try_get_log_entries<RB: std::ops::RangeBounds<u64> + Clone + std::fmt::Debug + OptionalSend>(
        &mut self,
        range: RB,
    ) -> Result<Vec<Entry<TypeConfig>>, StorageError<u64>> {
        let inner = self.inner.lock();
        Ok(inner.log.range(range).map(|(_, v)| v.clone()).collect())
    }
}

impl RaftLogStorage<TypeConfig> for LogStore {
    type LogReader = Self;

    async fn get_log_state(&mut self) -> Result<LogState<TypeConfig>, StorageError<u64>> {
        let inner = self.inner.lock();
        let last = inner.log.iter().next_back().map(|(_, e)| e.log_id);
        Ok(LogState {
            last_purged_log_id: inner.last_purged,
            last_log_id: last,
        })
    }

    async fn save_vote(&mut self, vote: &Vote<u64>) -> Result<(), StorageError<u64>> {
        self.inner.lock().vote = Some(*vote);
        Ok(())
    }

    async fn read_vote(&mut self) -> Result<Option<Vote<u64>>, StorageError<u64>> {
        Ok(self.inner.lock().vote)
    }

    async fn append<I>(&mut self, entries: I, callback: LogFlushed<TypeConfig>) -> Result<(), StorageError<u64>>
    where
        I: IntoIterator<Item = Entry<TypeConfig>> + Send,
    {
        {
            let mut inner = self.inner.lock();
            for entry in entries {
                inner.log.insert(entry.log_id.index, entry);
            }
        }
        callback.log_io_completed(Ok(()));
        Ok(())
    }

    async fn truncate(&mut self, log_id: LogId<u64>) -> Result<(), StorageError<u64>> {
        self.inner.lock().log.split_off(&log_id.index);
        Ok(())
    }

    async fn purge(&mut self, log_id: LogId<u64>) -> Result<(), StorageError<u64>> {
        let mut inner = self.inner.lock();
        inner.log = inner.log.split_off(&(log_id.index + 1));
        inner.last_purged = Some(log_id);
        Ok(())
    }

    fn get_log_reader(&mut self) -> impl std::future::Future<Output = Self::LogReader> + Send {
        let this = self.clone();
        async move { this }
    }
}

/// State machine side of storage: delegates `apply` to [`Fsm`] and
/// serializes a [`FsmSnapshot`] for Raft log compaction.
pub struct StateMachineStore {
    fsm: Arc<Fsm>,
    membership: Mutex<StoredMembership<TypeConfig>>,
    current_snapshot: Mutex<Option<StoredSnapshot>>,
}

#[derive(Clone)]
struct StoredSnapshot {
    meta: SnapshotMeta<TypeConfig>,
    data: Vec<u8>,
}

impl StateMachineStore {
    /// Construct a state machine adapter over `fsm`.
    pub fn new(fsm: Arc<Fsm>) -> Self {
        Self {
            fsm,
            membership: Mutex::new(StoredMembership::default()),
            current_snapshot: Mutex::new(None),
        }
    }
}

impl RaftSnapshotBuilder<TypeConfig> for StateMachineStore {
    async fn build_snapshot(&mut self) -> Result<Snapshot<TypeConfig>, StorageError<u64>> {
        let fsm_snapshot = self.fsm.snapshot();
        let last_applied = last_log_id_for(fsm_snapshot.last_applied);
        let membership = self.membership.lock().clone();

        let data = serde_json::to_vec(&fsm_snapshot).map_err(|e| {
            StorageError::read_snapshot(None, &std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;

        let meta = SnapshotMeta {
            last_log_id: last_applied,
            last_membership: membership,
            snapshot_id: format!("snap-{}", fsm_snapshot.last_applied),
        };

        *self.current_snapshot.lock() = Some(StoredSnapshot { meta: meta.clone(), data: data.clone() });

        Ok(Snapshot {
            meta,
            snapshot: Box::new(Cursor::new(data)),
        })
    }
}

impl RaftStateMachine<TypeConfig> for StateMachineStore {
    type SnapshotBuilder = Self;

    async fn applied_state(
        &mut self,
    ) -> Result<(Option<LogId<u64>>, StoredMembership<TypeConfig>), StorageError<u64>> {
        let last = last_log_id_for(self.fsm.last_applied());
        Ok((last, self.membership.lock().clone()))
    }

    async fn apply<I>(&mut self, entries: I) -> Result<Vec<CommandResult>, StorageError<u64>>
    where
        I: IntoIterator<Item = Entry<TypeConfig>> + OptionalSend,
        I::IntoIter: OptionalSend,
    {
        let mut results = Vec::new();
        for entry in entries {
            let index = entry.log_id.index;
            let result = match entry.payload {
                EntryPayload::Blank => CommandResult::TableCreated, // no-op heartbeat entry
                EntryPayload::Normal(cmd) => self.fsm.apply(index, &cmd),
                EntryPayload::Membership(membership) => {
                    *self.membership.lock() = StoredMembership::new(Some(entry.log_id), membership);
                    CommandResult::TableCreated // membership changes have no FSM-visible effect
                }
            };
            results.push(result);
        }
        Ok(results)
    }

    async fn get_snapshot_builder(&mut self) -> Self::SnapshotBuilder {
        StateMachineStore {
            fsm: self.fsm.clone(),
            membership: Mutex::new(self.membership.lock().clone()),
            current_snapshot: Mutex::new(self.current_snapshot.lock().clone()),
        }
    }

    async fn begin_receiving_snapshot(&mut self) -> Result<Box<Cursor<Vec<u8>>>, StorageError<u64>> {
        Ok(Box::new(Cursor::new(Vec::new())))
    }

    async fn install_snapshot(
        &mut self,
        meta: &SnapshotMeta<TypeConfig>,
        snapshot: Box<Cursor<Vec<u8>>>,
    ) -> Result<(), StorageError<u64>> {
        let data = snapshot.into_inner();
        let fsm_snapshot: FsmSnapshot = serde_json::from_slice(&data).map_err(|e| {
            StorageError::read_snapshot(Some(meta.signature()), &std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;
        self.fsm.restore(fsm_snapshot).map_err(|e| {
            StorageError::read_snapshot(Some(meta.signature()), &std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;
        *self.membership.lock() = meta.last_membership.clone();
        *self.current_snapshot.lock() = Some(StoredSnapshot { meta: meta.clone(), data });
        Ok(())
    }

    async fn get_current_snapshot(&mut self) -> Result<Option<Snapshot<TypeConfig>>, StorageError<u64>> {
        Ok(self.current_snapshot.lock().clone().map(|s| Snapshot {
            meta: s.meta,
            snapshot: Box::new(Cursor::new(s.data)),
        }))
    }
}

fn last_log_id_for(index: u64) -> Option<LogId<u64>> {
    if index == 0 {
        None
    } else {
        Some(LogId::new(openraft::CommittedLeaderId::new(0, 0), index))
    }
}

/// Marker so `IOFlushed` stays imported even when no code path constructs
/// one directly (it is produced by the `Raft` core and only consumed here).
#[allow(dead_code)]
fn _assert_io_flushed_type_is_used(_: &IOFlushed<TypeConfig>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use raftkv_storage::FsKvStore;
    use tempfile::tempdir;

    #[tokio::test]
    async fn log_store_append_and_read_back() {
        let mut log = LogStore::new();
        let entry = Entry {
            log_id: LogId::new(openraft::CommittedLeaderId::new(1, 0), 1),
            payload: EntryPayload::Blank,
        };
        let (tx, _rx) = tokio::sync::oneshot::channel();
        log.append(vec![entry], LogFlushed::new(None, tx)).await.unwrap();

        let state = log.get_log_state().await.unwrap();
        assert_eq!(state.last_log_id.unwrap().index, 1);
    }

    #[tokio::test]
    async fn state_machine_apply_delegates_to_fsm() {
        let dir = tempdir().unwrap();
        let store: Arc<dyn raftkv_storage::KVStore> = Arc::new(FsKvStore::new(dir.path()));
        let fsm = Arc::new(Fsm::new(0, store));
        let mut sm = StateMachineStore::new(fsm);

        let entry = Entry {
            log_id: LogId::new(openraft::CommittedLeaderId::new(1, 0), 1),
            payload: EntryPayload::Normal(raftkv_core::CommandLogEntry::CreateTable {
                schema: raftkv_core::table::TableMeta::new("Users", "id", None),
            }),
        };
        let results = sm.apply(vec![entry]).await.unwrap();
        assert_eq!(results, vec![CommandResult::TableCreated]);
    }
}
