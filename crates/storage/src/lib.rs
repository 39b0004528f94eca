//! Filesystem-backed storage for the replicated key-value store.
//!
//! Each item lives in its own JSON file under
//! `<dataRoot>/<nodeId>/kv/<table>/<key>.json`, written with a
//! write-temp-fsync-rename sequence so a crash mid-write can never leave a
//! half-written record behind. Last-writer-wins arbitration happens here,
//! keyed on the Raft commit index passed in as `version`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kvstore;
pub mod path;
pub mod record;

pub use kvstore::{DeleteOutcome, FsKvStore, KVStore, PutOutcome};
pub use record::KVStoreRecord;
