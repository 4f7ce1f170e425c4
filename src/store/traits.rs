use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use crate::chunk::Chunk;
use crate::store::error::StoreResult;
use crate::sync::Signature;

/// Repository of the latest signature per file
///
/// Every call holds the store's lock for its whole duration, so observers
/// never see a partially inserted or updated record. Returned signatures are
/// copies; they do not follow later updates.
pub trait SignatureStore: Send + Sync {
    /// Insert under a fresh identity and creation time, replacing any record
    /// for the same path
    fn save(&self, signature: Signature) -> StoreResult<Signature>;

    /// Retrieve the signature with the given identity
    fn get(&self, id: Uuid) -> StoreResult<Signature>;

    /// Refresh `last_modified` and upsert under the signature's own identity
    fn update(&self, signature: Signature) -> StoreResult<Signature>;

    /// Check whether any stored signature holds a chunk with the same bytes
    fn chunk_exists(&self, chunk: &Chunk) -> StoreResult<bool>;

    /// Retrieve a signature holding a chunk with the same bytes
    fn get_signature_for_chunk(&self, chunk: &Chunk) -> StoreResult<Signature>;

    /// Check whether a signature is recorded for `path`
    fn file_exists(&self, path: &Path) -> StoreResult<bool>;

    /// Retrieve the signature recorded for `path`
    fn get_signature_for_filename(&self, path: &Path) -> StoreResult<Signature>;

    /// All stored signatures, ordered by path
    fn list(&self) -> StoreResult<Vec<Signature>>;

    /// Number of stored signatures
    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Store handle shared between engines
pub type SharedStore = Arc<dyn SignatureStore>;
