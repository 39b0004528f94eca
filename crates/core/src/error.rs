//! Unified error type for the replicated key-value store.
//!
//! Mirrors the teacher-repo idiom of one layered error enum with constructor
//! helpers and `is_*` classification methods, rather than scattering `io`/
//! `serde_json` errors across call sites.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type RaftKvResult<T> = Result<T, RaftKvError>;

/// Unified error type returned by every layer of the store.
#[derive(Debug, Error)]
pub enum RaftKvError {
    /// The request failed input validation (missing/malformed attribute,
    /// wrong key type, empty table name, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// This node is not the Raft leader and cannot accept writes.
    #[error("not leader (known leader: {leader_id:?})")]
    NotLeader {
        /// Node id of the current leader, if known.
        leader_id: Option<u64>,
        /// HTTP address of the current leader, if known.
        leader_addr: Option<String>,
    },

    /// A write did not commit within the configured deadline.
    #[error("timeout waiting for command to commit")]
    Timeout,

    /// This node lost leadership while a write was in flight.
    #[error("leadership lost while committing")]
    LeadershipLost,

    /// The referenced table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// The referenced item does not exist.
    #[error("item not found")]
    ItemNotFound,

    /// The table already exists and cannot be created again with a
    /// different schema.
    #[error("table already exists: {0}")]
    Conflict(String),

    /// A write lost a last-writer-wins race and was not applied.
    #[error("skipped by last-writer-wins, current version is {winning_version}")]
    SkippedByLww {
        /// Version that won instead.
        winning_version: u64,
    },

    /// An underlying storage I/O failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// A Raft-layer failure (proposal rejected, network error, ...).
    #[error("raft error: {0}")]
    Raft(String),
}

impl RaftKvError {
    /// Build a [`RaftKvError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RaftKvError::NotLeader`].
    pub fn not_leader(leader_id: Option<u64>, leader_addr: Option<String>) -> Self {
        Self::NotLeader { leader_id, leader_addr }
    }

    /// Build a [`RaftKvError::TableNotFound`].
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Self::TableNotFound(table.into())
    }

    /// Build a [`RaftKvError::Conflict`].
    pub fn conflict(table: impl Into<String>) -> Self {
        Self::Conflict(table.into())
    }

    /// Build a [`RaftKvError::Storage`].
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`RaftKvError::Raft`].
    pub fn raft(msg: impl Into<String>) -> Self {
        Self::Raft(msg.into())
    }

    /// True for [`RaftKvError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True for [`RaftKvError::NotLeader`].
    pub fn is_not_leader(&self) -> bool {
        matches!(self, Self::NotLeader { .. })
    }

    /// True for [`RaftKvError::TableNotFound`] and [`RaftKvError::ItemNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound(_) | Self::ItemNotFound)
    }

    /// True for [`RaftKvError::Conflict`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// True for [`RaftKvError::SkippedByLww`].
    pub fn is_skipped_by_lww(&self) -> bool {
        matches!(self, Self::SkippedByLww { .. })
    }

    /// True for transient conditions worth retrying: timeouts, lost
    /// leadership, and not-leader redirects.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::LeadershipLost | Self::NotLeader { .. })
    }

    /// True for conditions that indicate a bug or data corruption rather
    /// than an expected runtime outcome.
    pub fn is_serious(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Raft(_))
    }
}

impl From<std::io::Error> for RaftKvError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for RaftKvError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_methods_partition_variants() {
        assert!(RaftKvError::validation("x").is_validation());
        assert!(RaftKvError::not_leader(Some(1), None).is_not_leader());
        assert!(RaftKvError::not_leader(Some(1), None).is_retryable());
        assert!(RaftKvError::TableNotFound("t".into()).is_not_found());
        assert!(RaftKvError::ItemNotFound.is_not_found());
        assert!(RaftKvError::conflict("t").is_conflict());
        assert!(RaftKvError::SkippedByLww { winning_version: 3 }.is_skipped_by_lww());
        assert!(RaftKvError::Timeout.is_retryable());
        assert!(RaftKvError::LeadershipLost.is_retryable());
        assert!(RaftKvError::storage("disk full").is_serious());
        assert!(RaftKvError::raft("proposal rejected").is_serious());
    }

    #[test]
    fn non_matching_variants_are_not_misclassified() {
        assert!(!RaftKvError::validation("x").is_retryable());
        assert!(!RaftKvError::validation("x").is_serious());
        assert!(!RaftKvError::Timeout.is_serious());
    }

    #[test]
    fn io_error_converts_to_storage() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RaftKvError = io_err.into();
        assert!(err.is_serious());
    }

    #[test]
    fn display_messages_are_human_readable() {
        assert_eq!(
            RaftKvError::table_not_found("Users").to_string(),
            "table not found: Users"
        );
        assert_eq!(
            RaftKvError::SkippedByLww { winning_version: 5 }.to_string(),
            "skipped by last-writer-wins, current version is 5"
        );
    }
}
