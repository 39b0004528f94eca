//! Core domain types for the replicated key-value store.
//!
//! This crate defines the types shared by every other layer and performs no
//! I/O of its own:
//! - [`AttributeValue`]: the typed value stored in an item attribute
//! - [`TableMeta`]: table identity and schema (partition/sort key)
//! - [`Item`] / [`ItemKey`]: a row and its derived storage key
//! - [`CommandLogEntry`] / [`CommandResult`]: the command union replicated
//!   through Raft and the outcome the state machine produces for it
//! - [`RaftKvError`] / [`RaftKvResult`]: the unified error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod command;
pub mod error;
pub mod item;
pub mod table;
pub mod value;

pub use command::{CommandLogEntry, CommandResult};
pub use error::{RaftKvError, RaftKvResult};
pub use item::{sanitize_key_part, Item, ItemKey};
pub use table::TableMeta;
pub use value::AttributeValue;
