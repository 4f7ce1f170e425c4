//! Chunk-wise comparison of two signatures

use std::convert::Infallible;

use crate::observe::{observed, Operation, SharedObserver};
use crate::sync::delta::{
    Delta, META_BASE_ID, META_FILE_HASH, META_FILE_SIZE, META_STRATEGY, META_UPDATED_ID,
};
use crate::sync::signature::Signature;

/// Comparison strategy recorded in the delta metadata
pub const STRATEGY_CHUNKWISE: &str = "chunkwise";
pub const STRATEGY_WHOLE_FILE: &str = "whole_file";

/// Compares a base signature against an updated one
///
/// Chunks are compared by index, so the engine only detects in-place
/// changes. When the chunk counts differ the whole updated file is reported
/// as modified; `added` is never populated.
#[derive(Clone, Default)]
pub struct DiffEngine {
    observer: Option<SharedObserver>,
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: Option<SharedObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Compute the delta from `base` to `updated`
    pub fn compare(&self, base: &Signature, updated: &Signature) -> Delta {
        let target = updated.file_path.display().to_string();
        let result: Result<Delta, Infallible> =
            observed(self.observer.as_ref(), Operation::Compare, &target, || {
                Ok(compare(base, updated))
            });
        match result {
            Ok(delta) => delta,
            Err(never) => match never {},
        }
    }
}

/// Compute the delta from `base` to `updated`
pub fn compare(base: &Signature, updated: &Signature) -> Delta {
    let mut delta = Delta::new();

    let strategy = if base.chunks.len() != updated.chunks.len() {
        delta.modified = updated.chunks.clone();
        STRATEGY_WHOLE_FILE
    } else {
        delta.modified = base
            .chunks
            .iter()
            .zip(&updated.chunks)
            .filter(|(old, new)| !old.same_content(new))
            .map(|(_, new)| new.clone())
            .collect();
        STRATEGY_CHUNKWISE
    };

    let meta = &mut delta.metadata;
    meta.insert(META_FILE_SIZE.to_string(), updated.file_size.to_string());
    meta.insert(META_FILE_HASH.to_string(), updated.file_hash_hex());
    meta.insert(META_BASE_ID.to_string(), base.id.to_string());
    meta.insert(META_UPDATED_ID.to_string(), updated.id.to_string());
    meta.insert(META_STRATEGY.to_string(), strategy.to_string());

    tracing::info!(
        path = %updated.file_path.display(),
        strategy,
        modified = delta.modified.len(),
        "compared signatures"
    );

    delta
}
