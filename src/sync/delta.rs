//! Delta between two signatures

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;

/// Metadata key holding the updated file size
pub const META_FILE_SIZE: &str = "file_size";
/// Metadata key holding the updated content hash (hex)
pub const META_FILE_HASH: &str = "file_hash";
pub const META_BASE_ID: &str = "base_id";
pub const META_UPDATED_ID: &str = "updated_id";
/// Metadata key naming the comparison strategy used
pub const META_STRATEGY: &str = "strategy";

/// Chunks needed to turn a base file into an updated one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    /// Chunks that extend the file past the base size
    pub added: Vec<Chunk>,
    /// Chunks to overwrite at their offsets
    pub modified: Vec<Chunk>,
    pub metadata: BTreeMap<String, String>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no chunk needs writing
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty()
    }

    /// Updated file size recorded in the metadata, if any
    pub fn target_size(&self) -> Option<u64> {
        self.metadata.get(META_FILE_SIZE)?.parse().ok()
    }

    /// Updated content hash recorded in the metadata, if any
    pub fn target_hash(&self) -> Option<&str> {
        self.metadata.get(META_FILE_HASH).map(String::as_str)
    }

    pub fn stats(&self) -> DeltaStats {
        DeltaStats {
            added_chunks: self.added.len(),
            modified_chunks: self.modified.len(),
            added_bytes: self.added.iter().map(|c| c.length).sum(),
            modified_bytes: self.modified.iter().map(|c| c.length).sum(),
        }
    }
}

/// Diagnostic dump; never parsed back
impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Added chunks:")?;
        for chunk in &self.added {
            writeln!(
                f,
                "  offset: {}, data: {}",
                chunk.offset,
                String::from_utf8_lossy(&chunk.data)
            )?;
        }
        writeln!(f, "Modified chunks:")?;
        for chunk in &self.modified {
            writeln!(
                f,
                "  offset: {}, data: {}",
                chunk.offset,
                String::from_utf8_lossy(&chunk.data)
            )?;
        }
        write!(f, "Metadata:")?;
        for (key, value) in &self.metadata {
            write!(f, "\n  {}: {}", key, value)?;
        }
        Ok(())
    }
}

/// Statistics about a delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaStats {
    pub added_chunks: usize,
    pub modified_chunks: usize,
    pub added_bytes: u64,
    pub modified_bytes: u64,
}

impl fmt::Display for DeltaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Delta: {} added ({} bytes), {} modified ({} bytes)",
            self.added_chunks, self.added_bytes, self.modified_chunks, self.modified_bytes
        )
    }
}
