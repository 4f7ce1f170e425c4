use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sync::{Delta, DeltaStats, Signature, SyncOutcome};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileQuery {
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Registered,
    Synchronized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureSummary {
    pub id: Uuid,
    pub file_path: String,
    pub file_size: u64,
    pub file_hash: String,
    pub chunk_count: usize,
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&Signature> for SignatureSummary {
    fn from(sig: &Signature) -> Self {
        Self {
            id: sig.id,
            file_path: sig.file_path.display().to_string(),
            file_size: sig.file_size,
            file_hash: sig.file_hash_hex(),
            chunk_count: sig.chunks.len(),
            last_modified: sig.last_modified,
            created_at: sig.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaSummary {
    pub stats: DeltaStats,
    pub added_offsets: Vec<u64>,
    pub modified_offsets: Vec<u64>,
    pub metadata: BTreeMap<String, String>,
}

impl From<&Delta> for DeltaSummary {
    fn from(delta: &Delta) -> Self {
        Self {
            stats: delta.stats(),
            added_offsets: delta.added.iter().map(|c| c.offset).collect(),
            modified_offsets: delta.modified.iter().map(|c| c.offset).collect(),
            metadata: delta.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    pub status: SyncStatus,
    pub signature: SignatureSummary,
    pub delta: Option<DeltaSummary>,
}

impl From<&SyncOutcome> for SyncResponse {
    fn from(outcome: &SyncOutcome) -> Self {
        let status = match outcome {
            SyncOutcome::Registered(_) => SyncStatus::Registered,
            SyncOutcome::Synchronized { .. } => SyncStatus::Synchronized,
        };
        Self {
            status,
            signature: outcome.signature().into(),
            delta: outcome.delta().map(DeltaSummary::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSignaturesResponse {
    pub signatures: Vec<SignatureSummary>,
    pub count: usize,
}
