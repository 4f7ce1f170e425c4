//! In-memory signature store

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chunk::Chunk;
use crate::store::error::{StoreError, StoreResult};
use crate::store::traits::SignatureStore;
use crate::sync::Signature;

/// Signature records keyed by identity
///
/// Shared by every backend; callers hold their lock around each method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Records {
    signatures: HashMap<Uuid, Signature>,
}

impl Records {
    /// Insert `signature`, evicting any other record for the same path
    pub(crate) fn upsert(&mut self, signature: Signature) -> Signature {
        let id = signature.id;
        let path = signature.file_path.clone();
        self.signatures
            .retain(|other_id, other| *other_id == id || other.file_path != path);
        self.signatures.insert(id, signature.clone());
        signature
    }

    pub(crate) fn save(&mut self, mut signature: Signature) -> Signature {
        signature.id = Uuid::new_v4();
        signature.created_at = Utc::now();
        self.upsert(signature)
    }

    pub(crate) fn update(&mut self, mut signature: Signature) -> Signature {
        signature.last_modified = Utc::now();
        self.upsert(signature)
    }

    pub(crate) fn get(&self, id: Uuid) -> StoreResult<Signature> {
        self.signatures
            .get(&id)
            .cloned()
            .ok_or(StoreError::SignatureNotFound(id))
    }

    pub(crate) fn find_by_path(&self, path: &Path) -> Option<&Signature> {
        self.signatures.values().find(|sig| sig.file_path == path)
    }

    pub(crate) fn find_by_chunk(&self, chunk: &Chunk) -> Option<&Signature> {
        self.signatures
            .values()
            .find(|sig| sig.chunks.iter().any(|c| c.same_content(chunk)))
    }

    pub(crate) fn list(&self) -> Vec<Signature> {
        let mut all: Vec<Signature> = self.signatures.values().cloned().collect();
        all.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        all
    }

    pub(crate) fn len(&self) -> usize {
        self.signatures.len()
    }
}

/// Signature store held entirely in memory
///
/// One mutex covers the whole map; there is no reader/writer split.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignatureStore for MemoryStore {
    fn save(&self, signature: Signature) -> StoreResult<Signature> {
        let saved = self.records.lock().save(signature);
        tracing::debug!(id = %saved.id, path = %saved.file_path.display(), "signature saved");
        Ok(saved)
    }

    fn get(&self, id: Uuid) -> StoreResult<Signature> {
        self.records.lock().get(id)
    }

    fn update(&self, signature: Signature) -> StoreResult<Signature> {
        let updated = self.records.lock().update(signature);
        tracing::debug!(id = %updated.id, path = %updated.file_path.display(), "signature updated");
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
