//! Blob storage seam.
//!
//! - `FsBlobStore`: a bucket directory on disk (`fs`)
//! - `MemoryBlobStore`: in-process map for tests and dry runs (`memory`)

pub mod fs;
pub mod memory;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

use crate::domain::StoredArtifact;
use crate::error::PipelineError;

/// Key/value blob store keyed by `/`-separated paths.
pub trait BlobStore {
    /// Store the artifact under its key, replacing any previous content.
    fn put(&self, artifact: &StoredArtifact) -> Result<(), PipelineError>;

    /// Read the bytes at `key`; `PipelineError::NotFound` when absent.
    fn get(&self, key: &str) -> Result<Vec<u8>, PipelineError>;

    /// Human-readable name of the target (shown in operator messages).
    fn target_name(&self) -> &str;
}

/// Reject keys that would escape the bucket or name nothing.
pub(crate) fn validate_key(key: &str) -> Result<(), PipelineError> {
    if key.is_empty() || key.starts_with('/') || key.ends_with('/') {
        return Err(PipelineError::StorageFailure(format!("invalid storage key '{key}'")));
    }
    if key.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
        return Err(PipelineError::StorageFailure(format!("invalid storage key '{key}'")));
    }
    Ok(())
}
