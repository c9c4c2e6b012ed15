//! In-memory bucket.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::domain::StoredArtifact;
use crate::error::PipelineError;
use crate::storage::{BlobStore, validate_key};

/// Single-threaded blob map that also counts calls.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RefCell<BTreeMap<String, StoredArtifact>>,
    puts: Cell<usize>,
    gets: Cell<usize>,
    fail_puts: Cell<bool>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail with `StorageFailure`.
    pub fn fail_writes(&self) {
        self.fail_puts.set(true);
    }

    pub fn artifact(&self, key: &str) -> Option<StoredArtifact> {
        self.blobs.borrow().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.blobs.borrow().keys().cloned().collect()
    }

    pub fn put_count(&self) -> usize {
        self.puts.get()
    }

    pub fn get_count(&self) -> usize {
        self.gets.get()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, artifact: &StoredArtifact) -> Result<(), PipelineError> {
        self.puts.set(self.puts.get() + 1);
        validate_key(&artifact.key)?;
        if self.fail_puts.get() {
            return Err(PipelineError::StorageFailure(format!(
                "write of '{}' rejected",
                artifact.key
            )));
        }
        self.blobs
            .borrow_mut()
            .insert(artifact.key.clone(), artifact.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, PipelineError> {
        self.gets.set(self.gets.get() + 1);
        self.blobs
            .borrow()
            .get(key)
            .map(|a| a.bytes.clone())
            .ok_or_else(|| PipelineError::NotFound(format!("key '{key}' does not exist in bucket memory")))
    }

    fn target_name(&self) -> &str {
        "memory"
    }
}
