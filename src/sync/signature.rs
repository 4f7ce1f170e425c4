//! File signatures
//!
//! A signature is the ordered chunk list of one captured version of a file,
//! plus the metadata needed to recognise it later.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chunk::{Chunk, Chunker, CHUNK_SIZE};
use crate::fileio::{self, FileStat};
use crate::observe::{observed, Operation, SharedObserver};
use crate::sync::error::{SyncError, SyncResult};

/// Captured description of one version of a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub id: Uuid,
    pub file_path: PathBuf,
    /// Total file size; always the sum of the chunk lengths
    pub file_size: u64,
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Full content hash (Blake3)
    pub file_hash: [u8; 32],
    /// Chunks in ascending offset order
    pub chunks: Vec<Chunk>,
}

impl Signature {
    /// Get number of chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Hex form of the content hash
    pub fn file_hash_hex(&self) -> String {
        hex::encode(self.file_hash)
    }

    /// Serialize to bytes (using bincode)
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "File path: {}", self.file_path.display())?;
        writeln!(f, "File size: {}", self.file_size)?;
        writeln!(f, "File hash: {}", self.file_hash_hex())?;
        writeln!(f, "Last modified: {}", self.last_modified)?;
        writeln!(f, "Created at: {}", self.created_at)?;
        write!(f, "Number of chunks: {}", self.chunks.len())?;
        for chunk in &self.chunks {
            write!(
                f,
                "\n  offset: {}, length: {}, fingerprint: {}",
                chunk.offset, chunk.length, chunk.fingerprint
            )?;
        }
        Ok(())
    }
}

/// Builder for file signatures
#[derive(Clone, Default)]
pub struct SignatureBuilder {
    chunk_size: Option<usize>,
    observer: Option<SharedObserver>,
}

impl SignatureBuilder {
    /// Create a new signature builder using [`CHUNK_SIZE`]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: Option<SharedObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[cfg(test)]
    pub(crate) fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    /// Open the file at `path` and build its signature
    pub fn build_from_path(&self, path: &Path) -> SyncResult<Signature> {
        let file = fileio::open_file(path)
            .map_err(|e| SyncError::io(format!("opening {}", path.display()), e))?;
        let stat = FileStat::of(&file)
            .map_err(|e| SyncError::io(format!("reading metadata of {}", path.display()), e))?;

        self.build_from_reader(file, path, stat)
    }

    /// Build a signature from a reader, using `stat` for the file metadata
    pub fn build_from_reader<R: Read>(
        &self,
        reader: R,
        path: &Path,
        stat: FileStat,
    ) -> SyncResult<Signature> {
        let target = path.display().to_string();
        observed(self.observer.as_ref(), Operation::BuildSignature, &target, || {
            self.build_inner(reader, path, stat)
        })
    }

    fn build_inner<R: Read>(&self, reader: R, path: &Path, stat: FileStat) -> SyncResult<Signature> {
        let chunker = match self.chunk_size {
            Some(size) => Chunker::with_chunk_size(reader, size)?,
            None => Chunker::new(reader),
        };

        let mut hasher = blake3::Hasher::new();
        let mut chunks = Vec::with_capacity((stat.size as usize).div_ceil(CHUNK_SIZE));
        let mut file_size = 0u64;

        for chunk in chunker {
            let chunk = chunk?;
            hasher.update(&chunk.data);
            file_size += chunk.length;
            chunks.push(chunk);
        }

        if file_size != stat.size {
            tracing::warn!(
                path = %path.display(),
                stat_size = stat.size,
                read_size = file_size,
                "file size changed while building signature"
            );
        }

        let signature = Signature {
            id: Uuid::new_v4(),
            file_path: path.to_path_buf(),
            file_size,
            last_modified: stat.modified,
            created_at: Utc::now(),
            file_hash: *hasher.finalize().as_bytes(),
            chunks,
        };

        tracing::info!(
            path = %path.display(),
            chunks = signature.chunks.len(),
            size = signature.file_size,
            "generated signature"
        );

        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn stat(size: usize) -> FileStat {
        FileStat {
            size: size as u64,
            modified: Utc::now(),
        }
    }

    #[test]
    fn test_signature_small_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");
        fileio::write_to_file(&path, b"test data").unwrap();

        let sig = SignatureBuilder::new().build_from_path(&path).unwrap();

        assert_eq!(sig.file_size, 9);
        assert_eq!(sig.file_path, path);
        assert_eq!(sig.chunks.len(), 1);
        assert_eq!(sig.chunks[0], Chunk::new(0, b"test data".to_vec()));
        assert_eq!(sig.file_hash, *blake3::hash(b"test data").as_bytes());
    }

    #[test]
    fn test_signature_sizes_add_up() {
        let data: Vec<u8> = (0..(2 * CHUNK_SIZE + 77)).map(|i| (i % 256) as u8).collect();
        let sig = SignatureBuilder::new()
            .build_from_reader(Cursor::new(&data), Path::new("mem"), stat(data.len()))
            .unwrap();

        assert_eq!(sig.chunks.len(), 3);
        let total: u64 = sig.chunks.iter().map(|c| c.length).sum();
        assert_eq!(total, sig.file_size);
        assert_eq!(sig.file_size, data.len() as u64);
    }

    #[test]
    fn test_identity_is_fresh_per_build() {
        let builder = SignatureBuilder::new();
        let a = builder
            .build_from_reader(Cursor::new(b"same"), Path::new("f"), stat(4))
            .unwrap();
        let b = builder
            .build_from_reader(Cursor::new(b"same"), Path::new("f"), stat(4))
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.chunks, b.chunks);
        assert_eq!(a.file_hash, b.file_hash);
    }

    #[test]
    fn test_empty_file() {
        let sig = SignatureBuilder::new()
            .build_from_reader(Cursor::new(Vec::new()), Path::new("empty"), stat(0))
            .unwrap();

        assert!(sig.is_empty());
        assert_eq!(sig.file_size, 0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = SignatureBuilder::new().build_from_path(&dir.path().join("nope"));
        assert!(matches!(result, Err(SyncError::Io { .. })));
    }

    #[test]
    fn test_signature_serialization() {
        let sig = SignatureBuilder::new()
            .build_from_reader(Cursor::new(b"serialize me"), Path::new("s"), stat(12))
            .unwrap();

        let restored = Signature::from_bytes(&sig.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, sig);
    }
}
