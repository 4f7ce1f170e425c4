use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::fingerprint::fingerprint;

/// A fixed-offset slice of a file's bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Byte offset of the first byte of this chunk in the file
    pub offset: u64,
    /// Number of bytes in `data`
    pub length: u64,
    pub data: Bytes,
    /// Weighted-sum fingerprint of `data`, see [`fingerprint`]
    pub fingerprint: u64,
}

impl Chunk {
    /// Create a chunk at `offset`, deriving length and fingerprint from `data`
    pub fn new(offset: u64, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            offset,
            length: data.len() as u64,
            fingerprint: fingerprint(&data),
            data,
        }
    }

    /// Offset one past the last byte of this chunk
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }

    /// Check whether `other` carries the same bytes, regardless of offset.
    ///
    /// Length and fingerprint are compared first; the byte comparison only
    /// runs when both agree.
    pub fn same_content(&self, other: &Chunk) -> bool {
        self.length == other.length
            && self.fingerprint == other.fingerprint
            && self.data == other.data
    }
}
