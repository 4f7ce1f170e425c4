use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Signature not found: {0}")]
    SignatureNotFound(Uuid),

    #[error("No signature recorded for file: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("No signature contains the given chunk")]
    ChunkNotFound,

    #[error("Persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Not-found errors mean "this is a new file", not a failure
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::SignatureNotFound(_) | StoreError::FileNotFound(_) | StoreError::ChunkNotFound
        )
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
