//! Local persistence
//!
//! Features:
//! - Namespaced keys (bulk clear only touches our prefix)
//! - JSON documents via serde
//! - Read-repair: corrupted documents are deleted and replaced by a fallback

pub mod medium;
pub mod store;

pub use medium::{MemoryStorage, StorageMedium};
pub use store::VersionedStore;

use thiserror::Error;

/// Failures surfaced by writes. Reads never fail.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
