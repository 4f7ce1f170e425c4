//! Sync pipeline driver
//!
//! Registers files the store has never seen, and for known files runs
//! build signature → compare → apply against the stored base.

use std::path::Path;

use crate::observe::{observed, Operation, SharedObserver};
use crate::store::SharedStore;
use crate::sync::apply::ApplyEngine;
use crate::sync::delta::Delta;
use crate::sync::diff::DiffEngine;
use crate::sync::error::SyncResult;
use crate::sync::signature::{Signature, SignatureBuilder};

/// What [`SyncEngine::handle`] did with a file
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// First sighting: the signature was saved as the base
    Registered(Signature),
    /// Known file: the delta was applied and the stored signature replaced
    Synchronized { delta: Delta, signature: Signature },
}

impl SyncOutcome {
    pub fn signature(&self) -> &Signature {
        match self {
            SyncOutcome::Registered(signature) => signature,
            SyncOutcome::Synchronized { signature, .. } => signature,
        }
    }

    pub fn delta(&self) -> Option<&Delta> {
        match self {
            SyncOutcome::Registered(_) => None,
            SyncOutcome::Synchronized { delta, .. } => Some(delta),
        }
    }
}

pub struct SyncEngine {
    store: SharedStore,
    builder: SignatureBuilder,
    diff: DiffEngine,
    apply: ApplyEngine,
    observer: Option<SharedObserver>,
}

impl SyncEngine {
    pub fn new(store: SharedStore) -> Self {
        Self::with_observer(store, None)
    }

    pub fn with_observer(store: SharedStore, observer: Option<SharedObserver>) -> Self {
        Self {
            builder: SignatureBuilder::new().with_observer(observer.clone()),
            diff: DiffEngine::new().with_observer(observer.clone()),
            apply: ApplyEngine::new(store.clone()).with_observer(observer.clone()),
            store,
            observer,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Build the signature of the file at `path` without touching the store
    pub fn signature(&self, path: &Path) -> SyncResult<Signature> {
        self.builder.build_from_path(path)
    }

    /// Compare two files on disk
    pub fn diff_files(&self, base: &Path, updated: &Path) -> SyncResult<Delta> {
        let base = self.builder.build_from_path(base)?;
        let updated = self.builder.build_from_path(updated)?;
        Ok(self.diff.compare(&base, &updated))
    }

    /// Compare two signatures
    pub fn compare(&self, base: &Signature, updated: &Signature) -> Delta {
        self.diff.compare(base, updated)
    }

    /// Write `delta` into `target` and update the store
    pub fn apply(&self, delta: &Delta, target: &Path) -> SyncResult<Signature> {
        self.apply.changes(delta, target)
    }

    /// Synchronize the file at `path` against its stored signature
    pub fn handle(&self, path: &Path) -> SyncResult<SyncOutcome> {
        let name = path.display().to_string();
        observed(self.observer.as_ref(), Operation::Handle, &name, || {
            tracing::info!(path = %path.display(), "handling file");

            let base = match self.store.get_signature_for_filename(path) {
                Ok(base) => base,
                Err(e) if e.is_not_found() => {
                    let updated = self.builder.build_from_path(path)?;
                    let saved = self.store.save(updated)?;
                    tracing::info!(path = %path.display(), id = %saved.id, "registered new file");
                    return Ok(SyncOutcome::Registered(saved));
                }
                Err(e) => return Err(e.into()),
            };

            let updated = self.builder.build_from_path(path)?;
            let delta = self.diff.compare(&base, &updated);
            let signature = self.apply.changes(&delta, &base.file_path)?;

            Ok(SyncOutcome::Synchronized { delta, signature })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fileio;
    use crate::observe::testing::RecordingObserver;
    use crate::observe::Outcome;
    use crate::store::{MemoryStore, SignatureStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_first_handle_registers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.txt");
        fileio::write_to_file(&path, b"brand new").unwrap();
        let store = Arc::new(MemoryStore::new());
        let engine = SyncEngine::new(store.clone());

        let outcome = engine.handle(&path).unwrap();

        assert!(matches!(outcome, SyncOutcome::Registered(_)));
        assert!(outcome.delta().is_none());
        assert!(store.file_exists(&path).unwrap());
    }

    #[test]
    fn test_second_handle_synchronizes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");
        fileio::write_to_file(&path, b"version one").unwrap();
        let store = Arc::new(MemoryStore::new());
        let engine = SyncEngine::new(store.clone());

        let registered = engine.handle(&path).unwrap();
        fileio::write_to_file(&path, b"version two").unwrap();
        let outcome = engine.handle(&path).unwrap();

        let delta = outcome.delta().unwrap();
        assert_eq!(delta.modified.len(), 1);
        assert_eq!(&delta.modified[0].data[..], b"version two");
        assert_eq!(outcome.signature().id, registered.signature().id);
        assert_eq!(std::fs::read(&path).unwrap(), b"version two");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_unchanged_file_gives_empty_delta() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("same.txt");
        fileio::write_to_file(&path, b"steady").unwrap();
        let engine = SyncEngine::new(Arc::new(MemoryStore::new()));

        engine.handle(&path).unwrap();
        let outcome = engine.handle(&path).unwrap();

        assert!(outcome.delta().unwrap().is_empty());
        assert_eq!(std::fs::read(&path).unwrap(), b"steady");
    }

    #[test]
    fn test_handle_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let engine = SyncEngine::new(Arc::new(MemoryStore::new()));

        let result = engine.handle(&dir.path().join("ghost.txt"));
        assert!(result.is_err());
        assert!(!result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_observer_sees_every_stage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("watched.txt");
        fileio::write_to_file(&path, b"watch me").unwrap();
        let recorder = Arc::new(RecordingObserver::default());
        let engine = SyncEngine::with_observer(
            Arc::new(MemoryStore::new()),
            Some(recorder.clone() as SharedObserver),
        );

        engine.handle(&path).unwrap();
        engine.handle(&path).unwrap();

        let events = recorder.events.lock();
        let finished: Vec<Operation> = events
            .iter()
            .filter(|(kind, _, outcome)| kind == "finish" && *outcome == Outcome::Ok)
            .map(|(_, op, _)| *op)
            .collect();
        assert_eq!(
            finished,
            vec![
                Operation::BuildSignature,
                Operation::Handle,
                Operation::BuildSignature,
                Operation::Compare,
                Operation::BuildSignature,
                Operation::Apply,
                Operation::Handle,
            ]
        );
        assert_eq!(events.len(), 2 * finished.len());
    }
}
