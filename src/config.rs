//! Runtime configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::{MemoryStore, SharedStore, SnapshotStore, StoreResult};

/// Which signature store backend to construct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Memory,
    /// Bincode snapshot at the given path
    Snapshot(PathBuf),
}

impl StoreBackend {
    pub fn open(&self) -> StoreResult<SharedStore> {
        Ok(match self {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Snapshot(path) => Arc::new(SnapshotStore::open(path.clone())?),
        })
    }
}

/// Parses `memory` or `snapshot:<path>`
impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None if s == "memory" => Ok(StoreBackend::Memory),
            Some(("snapshot", path)) if !path.is_empty() => {
                Ok(StoreBackend::Snapshot(PathBuf::from(path)))
            }
            _ => Err(format!(
                "invalid store backend {s:?}, expected \"memory\" or \"snapshot:<path>\""
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreBackend,
    /// Bind address for the demo HTTP service
    pub bind_addr: SocketAddr,
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreBackend::Memory,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: StoreBackend) -> Self {
        self.store = store;
        self
    }

    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}
