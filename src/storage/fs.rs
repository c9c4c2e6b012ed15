//! Filesystem-backed bucket.
//!
//! Keys map to paths under the bucket directory. Writes go to a sibling temp
//! file first and are renamed into place, so a reader sees either the old
//! content or the new one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::StoredArtifact;
use crate::error::PipelineError;
use crate::storage::{BlobStore, validate_key};

pub struct FsBlobStore {
    root: PathBuf,
    name: String,
}

impl FsBlobStore {
    /// Open (creating if needed) the bucket directory `root`.
    pub fn open(root: impl Into<PathBuf>, name: impl Into<String>) -> Result<Self, PipelineError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            PipelineError::StorageFailure(format!("failed to create bucket dir '{}': {e}", root.display()))
        })?;
        Ok(Self { root, name: name.into() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PipelineError> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |path, segment| path.join(segment)))
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, artifact: &StoredArtifact) -> Result<(), PipelineError> {
        let path = self.path_for(&artifact.key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PipelineError::StorageFailure(format!("failed to create '{}': {e}", parent.display()))
            })?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(".part");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &artifact.bytes)
            .map_err(|e| PipelineError::StorageFailure(format!("failed to write '{}': {e}", artifact.key)))?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            PipelineError::StorageFailure(format!("failed to commit '{}': {e}", artifact.key))
        })?;

        log::debug!(
            "stored {} ({} bytes, {}) at {}",
            artifact.key,
            artifact.bytes.len(),
            artifact.media_type.mime(),
            path.display()
        );
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, PipelineError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(PipelineError::NotFound(format!(
                "key '{key}' does not exist in bucket {}",
                self.name
            ))),
            Err(e) => Err(PipelineError::StorageFailure(format!("failed to read '{key}': {e}"))),
        }
    }

    fn target_name(&self) -> &str {
        &self.name
    }
}
