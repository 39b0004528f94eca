//! The persisted form of a single item, and atomic file I/O for it.
//!
//! Writes follow the write-temp-fsync-rename pattern: the new content lands
//! in a hidden `.tmp` sibling, is fsynced, then renamed over the real path
//! (an atomic operation on the same filesystem), and finally the containing
//! directory is fsynced so the rename itself is durable.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use raftkv_core::{Item, RaftKvResult};

/// On-disk record for one item: its data plus the LWW version it was
/// written at. Deletes are physical file removal (see
/// [`remove_record`]), not a tombstone record, so every record that
/// exists on disk is live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KVStoreRecord {
    /// Raft commit index this record was written at. Higher always wins.
    pub version: u64,
    /// The item's attributes.
    pub item: Item,
}

impl KVStoreRecord {
    /// A record holding `item` at `version`.
    pub fn new(version: u64, item: Item) -> Self {
        Self { version, item }
    }
}

/// Read and parse the record at `path`, if it exists.
pub fn read_record(path: &Path) -> RaftKvResult<Option<KVStoreRecord>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write `record` to `path` atomically, creating parent directories as
/// needed.
pub fn write_record_atomic(path: &Path, tmp_path: &Path, record: &KVStoreRecord) -> RaftKvResult<()> {
    let dir = path.parent().expect("item path always has a table directory parent");
    fs::create_dir_all(dir)?;

    let bytes = serde_json::to_vec(record)?;
    {
        let mut f = File::create(tmp_path)?;
        f.write_all(&bytes)?;
        f.sync_all()?;
    }
    fs::rename(tmp_path, path)?;
    sync_dir(dir)?;
    Ok(())
}

/// Remove the record at `path`, if present.
pub fn remove_record(path: &Path) -> RaftKvResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use raftkv_core::AttributeValue;
    use tempfile::tempdir;

    fn sample_item() -> Item {
        let mut attrs = BTreeMap::new();
        attrs.insert("id".to_string(), AttributeValue::S("alice".into()));
        Item::new(attrs)
    }

    #[test]
    fn write_then_read_roundtrips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t").join("alice.json");
        let tmp = dir.path().join("t").join(".alice.json.tmp");
        let record = KVStoreRecord::new(3, sample_item());

        write_record_atomic(&path, &tmp, &record).unwrap();
        let read_back = read_record(&path).unwrap().unwrap();
        assert_eq!(read_back, record);
        assert!(!tmp.exists(), "temp file should be renamed away");
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t").join("missing.json");
        assert_eq!(read_record(&path).unwrap(), None);
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t").join("alice.json");
        let tmp = dir.path().join("t").join(".alice.json.tmp");
        write_record_atomic(&path, &tmp, &KVStoreRecord::new(1, sample_item())).unwrap();

        remove_record(&path).unwrap();
        assert_eq!(read_record(&path).unwrap(), None);
        remove_record(&path).unwrap();
    }
}
