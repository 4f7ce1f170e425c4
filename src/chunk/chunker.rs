use std::io::{ErrorKind, Read};

use bytes::Bytes;

use super::error::{ChunkError, Result};
use super::types::Chunk;

/// Size of every chunk except possibly the last one (8KB)
pub const CHUNK_SIZE: usize = 8192;

/// Streaming fixed-size chunker
///
/// Yields chunks in file order. Boundaries always fall on multiples of the
/// chunk size, so an insertion that is not a multiple of it shifts every
/// following chunk.
pub struct Chunker<R> {
    reader: R,
    chunk_size: usize,
    offset: u64,
    done: bool,
}

impl<R: Read> Chunker<R> {
    /// Create a chunker over `reader` using [`CHUNK_SIZE`]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            chunk_size: CHUNK_SIZE,
            offset: 0,
            done: false,
        }
    }

    /// Create a chunker with a non-default chunk size
    pub(crate) fn with_chunk_size(reader: R, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ChunkError::InvalidChunkSize(chunk_size));
        }
        Ok(Self {
            reader,
            chunk_size,
            offset: 0,
            done: false,
        })
    }

    /// Drain the reader into a chunk list
    pub fn collect_chunks(self) -> Result<Vec<Chunk>> {
        self.collect()
    }

    /// Fill `buf` until it is full or the reader is exhausted
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(ChunkError::Read {
                        offset: self.offset + filled as u64,
                        source,
                    })
                }
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for Chunker<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buffer = vec![0u8; self.chunk_size];
        let n = match self.fill(&mut buffer) {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        if n < self.chunk_size {
            self.done = true;
        }
        if n == 0 {
            return None;
        }

        buffer.truncate(n);
        let chunk = Chunk::new(self.offset, Bytes::from(buffer));
        self.offset += n as u64;
        Some(Ok(chunk))
    }
}
