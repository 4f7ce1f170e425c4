use std::path::PathBuf;

use thiserror::Error;

use crate::chunk::ChunkError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Chunking failed: {0}")]
    Chunk(#[from] ChunkError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Content of {} does not match the delta after apply", .path.display())]
    IntegrityMismatch { path: PathBuf },
}

impl SyncError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SyncError::Io {
            context: context.into(),
            source,
        }
    }

    /// True when the error only means "no record yet"
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::Store(e) if e.is_not_found())
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
