//! Fixed-size content chunking
//!
//! Splits a byte stream into chunks of [`CHUNK_SIZE`] bytes, each tagged with
//! its offset and a fast fingerprint used as an equality pre-filter.

pub mod chunker;
pub mod error;
pub mod fingerprint;
pub mod types;

pub use chunker::{Chunker, CHUNK_SIZE};
pub use error::{ChunkError, Result};
pub use fingerprint::fingerprint;
pub use types::Chunk;
