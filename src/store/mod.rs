//! Signature storage
//!
//! One live signature per file path, behind a single lock per store.

pub mod error;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;
pub use traits::{SharedStore, SignatureStore};
