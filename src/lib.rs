//! chunksync - local delta synchronization
//!
//! Splits files into fixed-size chunks, records a signature per file, and
//! brings a file up to date by writing only the chunks that changed.
//!
//! ```ignore
//! use std::sync::Arc;
//! use chunksync::store::MemoryStore;
//! use chunksync::sync::SyncEngine;
//!
//! let engine = SyncEngine::new(Arc::new(MemoryStore::new()));
//! engine.handle("notes.txt".as_ref())?; // registers the file
//! // ... file changes on disk ...
//! let outcome = engine.handle("notes.txt".as_ref())?;
//! println!("{}", outcome.delta().unwrap());
//! ```

pub mod api;
pub mod chunk;
pub mod config;
pub mod fileio;
pub mod observe;
pub mod store;
pub mod sync;
pub mod telemetry;
