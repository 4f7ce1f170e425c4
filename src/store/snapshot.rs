//! File-backed signature store
//!
//! Keeps the same records as [`MemoryStore`](super::MemoryStore) and writes
//! a bincode snapshot of them after every mutation, while still holding the
//! lock. Snapshots are written to a sibling temp file and renamed into
//! place, so a crash leaves either the old or the new snapshot. A mutation
//! only becomes visible once its snapshot has been written.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use uuid::Uuid;

use crate::chunk::Chunk;
use crate::store::error::{StoreError, StoreResult};
use crate::store::memory::Records;
use crate::store::traits::SignatureStore;
use crate::sync::Signature;

pub struct SnapshotStore {
    records: Mutex<Records>,
    path: PathBuf,
}

impl SnapshotStore {
    /// Open the store at `path`, loading an existing snapshot if present
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let records = if path.exists() {
            let data = fs::read(&path)?;
            let records: Records = bincode::deserialize(&data)?;
            tracing::info!(
                path = %path.display(),
                signatures = records.len(),
                "loaded signature snapshot"
            );
            records
        } else {
            Records::default()
        };

        Ok(Self {
            records: Mutex::new(records),
            path,
        })
    }

    /// Location of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the next snapshot is written to before the rename
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn persist(&self, records: &Records) -> StoreResult<()> {
        let data = bincode::serialize(records)?;
        let tmp = self.temp_path();

        let mut file = fs::File::create(&tmp)?;
        file.write_all(&data)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SignatureStore for SnapshotStore {
    fn save(&self, signature: Signature) -> StoreResult<Signature> {
        let mut records = self.records.lock();
        let mut next = records.clone();
        let saved = next.save(signature);
        self.persist(&next)?;
        *records = next;
        Ok(saved)
    }

    fn get(&self, id: Uuid) -> StoreResult<Signature> {
        self.records.lock().get(id)
    }

    fn update(&self, signature: Signature) -> StoreResult<Signature> {
        let mut records = self.records.lock();
        let mut next = records.clone();
        let updated = next.update(signature);
        self.persist(&next)?;
        *records = next;
        Ok(updated)
    }

    fn chunk_exists(&self, chunk: &Chunk) -> StoreResult<bool> {
        Ok(self.records.lock().find_by_chunk(chunk).is_some())
    }

    fn get_signature_for_chunk(&self, chunk: &Chunk) -> StoreResult<Signature> {
        self.records
            .lock()
            .find_by_chunk(chunk)
            .cloned()
            .ok_or(StoreError::ChunkNotFound)
    }

    fn file_exists(&self, path: &Path) -> StoreResult<bool> {
        Ok(self.records.lock().find_by_path(path).is_some())
    }

    fn get_signature_for_filename(&self, path: &Path) -> StoreResult<Signature> {
        self.records
            .lock()
            .find_by_path(path)
            .cloned()
            .ok_or_else(|| StoreError::FileNotFound(path.to_path_buf()))
    }

    fn list(&self) -> StoreResult<Vec<Signature>> {
        Ok(self.records.lock().list())
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.records.lock().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::SignatureBuilder;
    use tempfile::TempDir;

    fn signature_for(dir: &TempDir, name: &str, content: &[u8]) -> Signature {
        let path = dir.path().join(name);
        crate::fileio::write_to_file(&path, content).unwrap();
        SignatureBuilder::new().build_from_path(&path).unwrap()
    }

    #[test]
    fn test_snapshot_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("signatures.bin");

        let saved = {
            let store = SnapshotStore::open(&db).unwrap();
            assert_eq!(store.len().unwrap(), 0);
            store.save(signature_for(&dir, "a.txt", b"persist me")).unwrap()
        };

        let reopened = SnapshotStore::open(&db).unwrap();
        assert_eq!(reopened.len().unwrap(), 1);
        assert_eq!(reopened.get(saved.id).unwrap(), saved);
        assert!(reopened.file_exists(&dir.path().join("a.txt")).unwrap());
    }

    #[test]
    fn test_update_is_persisted() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("signatures.bin");
        let store = SnapshotStore::open(&db).unwrap();

        let saved = store.save(signature_for(&dir, "a.txt", b"v1")).unwrap();
        let mut next = signature_for(&dir, "a.txt", b"v2");
        next.id = saved.id;
        store.update(next).unwrap();
        drop(store);

        let reopened = SnapshotStore::open(&db).unwrap();
        let current = reopened.get(saved.id).unwrap();
        assert_eq!(&current.chunks[0].data[..], b"v2");
    }

    #[test]
    fn test_failed_persist_leaves_records_unchanged() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("signatures.bin");
        let store = SnapshotStore::open(&db).unwrap();
        let kept = store.save(signature_for(&dir, "a.txt", b"kept")).unwrap();

        // A directory in the temp file's place makes every write fail
        fs::create_dir(store.temp_path()).unwrap();

        let result = store.save(signature_for(&dir, "b.txt", b"lost"));
        assert!(matches!(result, Err(StoreError::Persistence(_))));
        assert_eq!(store.len().unwrap(), 1);
        assert!(!store.file_exists(&dir.path().join("b.txt")).unwrap());

        let mut changed = signature_for(&dir, "a.txt", b"changed");
        changed.id = kept.id;
        assert!(store.update(changed).is_err());
        assert_eq!(store.get(kept.id).unwrap(), kept);

        let reopened = SnapshotStore::open(&db).unwrap();
        assert_eq!(reopened.len().unwrap(), 1);
        assert_eq!(reopened.get(kept.id).unwrap(), kept);
    }

    #[test]
    fn test_temp_file_differs_from_tmp_snapshot() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("signatures.tmp");
        let store = SnapshotStore::open(&db).unwrap();

        assert_ne!(store.temp_path(), db);
        let saved = store.save(signature_for(&dir, "a.txt", b"tmp named")).unwrap();
        drop(store);

        let reopened = SnapshotStore::open(&db).unwrap();
        assert_eq!(reopened.get(saved.id).unwrap(), saved);
        assert!(!dir.path().join("signatures.tmp.tmp").exists());
    }

    #[test]
    fn test_corrupt_snapshot_is_rejected() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("signatures.bin");
        fs::write(&db, b"\xff\xff\xff\xff\xff\xff\xff\xff\xff").unwrap();

        assert!(matches!(
            SnapshotStore::open(&db),
            Err(StoreError::Serialization(_))
        ));
    }
}
