//! `NodeFacade`: the boundary between transports (HTTP, CLI-in-process
//! tests) and the Raft-replicated store.
//!
//! Writes go `propose_*` -> [`RaftEngine::propose`] -> commit -> FSM apply;
//! reads go straight to the local FSM's `TableRegistry` and `KVStore` and
//! so reflect only what has committed *on this node* (the simulator's
//! eventual-consistency read model).

use std::sync::Arc;

use async_trait::async_trait;

use raftkv_core::{CommandLogEntry, CommandResult, Item, RaftKvError, RaftKvResult};
use raftkv_core::table::TableMeta;
use raftkv_engine::Fsm;
use raftkv_raft::RaftEngine;

use crate::facade::types::{NodeStats, WriteOutcome};

/// The node-local API surface. Object-safe so handlers can hold
/// `Arc<dyn NodeFacade>` without committing to a concrete engine type.
#[async_trait]
pub trait NodeFacade: Send + Sync {
    /// Propose creating `schema` as a new table.
    async fn propose_create_table(&self, schema: TableMeta) -> RaftKvResult<WriteOutcome>;

    /// Propose deleting `table`.
    async fn propose_delete_table(&self, table: String) -> RaftKvResult<WriteOutcome>;

    /// Propose writing `item` into `table`.
    async fn propose_put_item(&self, table: String, item: Item) -> RaftKvResult<WriteOutcome>;

    /// Propose deleting the item identified by `key_item`'s key attributes.
    async fn propose_delete_item(&self, table: String, key_item: Item) -> RaftKvResult<WriteOutcome>;

    /// Read an item directly from this node's local state, bypassing Raft.
    fn local_get(&self, table: &str, key_item: &Item) -> RaftKvResult<Option<Item>>;

    /// Read every item sharing `key_item`'s partition key, local-only.
    fn local_query(&self, table: &str, partition_key_item: &Item) -> RaftKvResult<Vec<Item>>;

    /// True if this node currently believes it is the Raft leader.
    fn is_leader(&self) -> bool;

    /// The current leader's (node id, HTTP address), if known.
    fn leader_info(&self) -> Option<(u64, Option<String>)>;

    /// Node identity and Raft role snapshot, for `/status`.
    fn stats(&self) -> NodeStats;
}

fn _assert_object_safe(_: &dyn NodeFacade) {}

/// The concrete [`NodeFacade`] wiring a [`RaftEngine`] to its [`Fsm`].
pub struct NodeFacadeImpl {
    engine: Arc<dyn RaftEngine>,
    fsm: Arc<Fsm>,
}

impl NodeFacadeImpl {
    /// Construct a facade over `engine`, reading local state from `fsm`.
    pub fn new(engine: Arc<dyn RaftEngine>, fsm: Arc<Fsm>) -> Self {
        Self { engine, fsm }
    }

    async fn propose(&self, command: CommandLogEntry) -> RaftKvResult<WriteOutcome> {
        match self.engine.propose(command).await? {
            CommandResult::TableCreated => Ok(WriteOutcome::TableCreated),
            CommandResult::TableDeleted => Ok(WriteOutcome::TableDeleted),
            CommandResult::ItemPut { version } => Ok(WriteOutcome::ItemPut { version }),
            CommandResult::ItemDeleted => Ok(WriteOutcome::ItemDeleted),
            CommandResult::SkippedByLww { winning_version } => {
                Ok(WriteOutcome::SkippedByLww { winning_version })
            }
            CommandResult::TableNotFound { table } => Err(RaftKvError::table_not_found(table)),
            CommandResult::Conflict { table } => Err(RaftKvError::conflict(table)),
            CommandResult::Rejected { reason } => Err(RaftKvError::validation(reason)),
        }
    }

    fn key_item_lookup(&self, table: &str, key_item: &Item) -> RaftKvResult<(TableMeta, raftkv_core::ItemKey)> {
        let schema = self
            .fsm
            .tables()
            .get(table)
            .ok_or_else(|| RaftKvError::table_not_found(table))?;
        let key = raftkv_core::ItemKey::derive(&schema, key_item)?;
        Ok((schema, key))
    }
}

#[async_trait]
impl NodeFacade for NodeFacadeImpl {
    async fn propose_create_table(&self, schema: TableMeta) -> RaftKvResult<WriteOutcome> {
        self.propose(CommandLogEntry::CreateTable { schema }).await
    }

    async fn propose_delete_table(&self, table: String) -> RaftKvResult<WriteOutcome> {
        self.propose(CommandLogEntry::DeleteTable { table }).await
    }

    async fn propose_put_item(&self, table: String, item: Item) -> RaftKvResult<WriteOutcome> {
        self.propose(CommandLogEntry::PutItem { table, item }).await
    }

    async fn propose_delete_item(&self, table: String, key_item: Item) -> RaftKvResult<WriteOutcome> {
        self.propose(CommandLogEntry::DeleteItem { table, key_item }).await
    }

    fn local_get(&self, table: &str, key_item: &Item) -> RaftKvResult<Option<Item>> {
        let (_, key) = self.key_item_lookup(table, key_item)?;
        self.fsm.store().get(self.engine.node_id(), table, &key)
    }

    fn local_query(&self, table: &str, partition_key_item: &Item) -> RaftKvResult<Vec<Item>> {
        let schema = self
            .fsm
            .tables()
            .get(table)
            .ok_or_else(|| RaftKvError::table_not_found(table))?;
        let pk_value = partition_key_item
            .get(&schema.partition_key)
            .ok_or_else(|| RaftKvError::validation(format!("missing partition key attribute '{}'", schema.partition_key)))?;
        let prefix = pk_value
            .key_string()
            .ok_or_else(|| RaftKvError::validation(format!("partition key attribute '{}' must be S or N", schema.partition_key)))?;
        let prefix = raftkv_core::sanitize_key_part(&prefix);
        self.fsm.store().query(self.engine.node_id(), table, &prefix)
    }

    fn is_leader(&self) -> bool {
        self.engine.is_leader()
    }

    fn leader_info(&self) -> Option<(u64, Option<String>)> {
        self.engine.current_leader()
    }

    fn stats(&self) -> NodeStats {
        let leader = self.engine.current_leader();
        NodeStats {
            node_id: self.engine.node_id(),
            state: self.engine.role_name(),
            term: self.engine.current_term(),
            is_leader: self.engine.is_leader(),
            leader_id: leader.as_ref().map(|(id, _)| *id),
            leader_addr: leader.and_then(|(_, addr)| addr),
            tables: self.fsm.tables().names(),
        }
    }
}
