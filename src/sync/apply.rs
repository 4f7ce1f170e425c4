//! Writes a delta into a target file
//!
//! Each chunk is a single write call, but the apply as a whole is not
//! transactional: a failure part way through leaves the file with a mix of
//! old and new chunks. Nothing locks the target file, so callers must make
//! sure no one else writes to it during an apply.

use std::path::Path;

use crate::fileio;
use crate::observe::{observed, Operation, SharedObserver};
use crate::store::SharedStore;
use crate::sync::delta::Delta;
use crate::sync::error::{SyncError, SyncResult};
use crate::sync::signature::{Signature, SignatureBuilder};

pub struct ApplyEngine {
    store: SharedStore,
    builder: SignatureBuilder,
    observer: Option<SharedObserver>,
}

impl ApplyEngine {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            builder: SignatureBuilder::new(),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Option<SharedObserver>) -> Self {
        self.builder = self.builder.with_observer(observer.clone());
        self.observer = observer;
        self
    }

    /// Write `delta` into `target` and record the resulting signature.
    ///
    /// Added chunks are appended, modified chunks are written at their
    /// offsets, and the file is then resized to the size the delta records.
    /// The stored signature for `target` keeps its identity and creation
    /// time.
    pub fn changes(&self, delta: &Delta, target: &Path) -> SyncResult<Signature> {
        let name = target.display().to_string();
        observed(self.observer.as_ref(), Operation::Apply, &name, || {
            self.write_chunks(delta, target)?;
            let signature = self.rederive(delta, target)?;
            let saved = self.store.update(signature)?;

            tracing::info!(
                path = %target.display(),
                id = %saved.id,
                size = saved.file_size,
                "changes applied, signature updated"
            );
            Ok(saved)
        })
    }

    fn write_chunks(&self, delta: &Delta, target: &Path) -> SyncResult<()> {
        let mut file = fileio::open_for_write(target)
            .map_err(|e| SyncError::io(format!("opening {} for write", target.display()), e))?;

        for chunk in &delta.added {
            fileio::append(&mut file, &chunk.data).map_err(|e| {
                SyncError::io(format!("appending chunk at offset {}", chunk.offset), e)
            })?;
        }
        for chunk in &delta.modified {
            fileio::write_at(&mut file, chunk.offset, &chunk.data).map_err(|e| {
                SyncError::io(format!("writing chunk at offset {}", chunk.offset), e)
            })?;
        }

        if let Some(size) = delta.target_size() {
            file.set_len(size)
                .map_err(|e| SyncError::io(format!("resizing {} to {size}", target.display()), e))?;
        }
        file.sync_all()
            .map_err(|e| SyncError::io(format!("flushing {}", target.display()), e))?;

        tracing::debug!(
            path = %target.display(),
            added = delta.added.len(),
            modified = delta.modified.len(),
            "delta written"
        );
        Ok(())
    }

    /// Build the post-apply signature, carrying over the stored identity
    fn rederive(&self, delta: &Delta, target: &Path) -> SyncResult<Signature> {
        let mut signature = self.builder.build_from_path(target)?;

        if let Some(expected) = delta.target_hash() {
            if signature.file_hash_hex() != expected {
                return Err(SyncError::IntegrityMismatch {
                    path: target.to_path_buf(),
                });
            }
        }

        match self.store.get_signature_for_filename(target) {
            Ok(previous) => {
                signature.id = previous.id;
                signature.created_at = previous.created_at;
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }
        Ok(signature)
    }
}
