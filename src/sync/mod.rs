//! Delta synchronization module
//!
//! Signature building, chunk-wise diffing and in-place apply, plus the
//! engine that drives them against a signature store.

pub mod apply;
pub mod delta;
pub mod diff;
pub mod engine;
pub mod error;
pub mod signature;

pub use apply::ApplyEngine;
pub use delta::{Delta, DeltaStats};
pub use diff::{compare, DiffEngine};
pub use engine::{SyncEngine, SyncOutcome};
pub use error::{SyncError, SyncResult};
pub use signature::{Signature, SignatureBuilder};
