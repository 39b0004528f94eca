//! The command union replicated through Raft and applied by the FSM.

use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::table::TableMeta;

/// One entry in the replicated command log.
///
/// This is the payload carried inside each Raft log entry; the FSM is the
/// single place that interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandLogEntry {
    /// Create a table with the given schema. Fails if the name is already
    /// taken by another table.
    CreateTable {
        /// Schema to create.
        schema: TableMeta,
    },
    /// Drop a table and everything in it.
    DeleteTable {
        /// Table to drop.
        table: String,
    },
    /// Write (insert or overwrite) an item.
    PutItem {
        /// Target table.
        table: String,
        /// Item to write.
        item: Item,
    },
    /// Delete an item by its key attributes.
    DeleteItem {
        /// Target table.
        table: String,
        /// Item carrying (at least) the key attributes to delete.
        key_item: Item,
    },
}

/// The outcome of applying a [`CommandLogEntry`] to the state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandResult {
    /// A table was created (or already existed).
    TableCreated,
    /// A table was deleted.
    TableDeleted,
    /// An item was written, at the given resulting version (Raft log index).
    ItemPut {
        /// Commit index the item was written at.
        version: u64,
    },
    /// An item was deleted.
    ItemDeleted,
    /// The write lost a last-writer-wins race against a newer version
    /// already present and was not applied.
    SkippedByLww {
        /// Version (commit index) of the value that won instead.
        winning_version: u64,
    },
    /// The command referenced a table that does not exist.
    TableNotFound {
        /// Table name that was not found.
        table: String,
    },
    /// `CreateTable` named a table that already exists.
    Conflict {
        /// Table name that already exists.
        table: String,
    },
    /// The command failed validation (e.g. a missing key attribute).
    Rejected {
        /// Human-readable rejection reason.
        reason: String,
    },
}
