use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("IO error while reading chunk at offset {offset}: {source}")]
    Read {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid chunk size: {0}")]
    InvalidChunkSize(usize),
}

pub type Result<T> = std::result::Result<T, ChunkError>;
