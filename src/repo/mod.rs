//! Storage-agnostic repository contract.
//!
//! A repository root holds one `models_index.json` plus one
//! `<modelId>/<version>/` subtree per release, containing `model.json`
//! and the payload/image files its metadata references. Two backends
//! implement the contract with identical observable behavior: a local or
//! network-shared directory tree, and an HTTP endpoint. Callers are
//! written against the trait alone.

pub mod http;
pub mod local;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ModelIndex, ModelMeta};

pub use http::HttpRepository;
pub use local::LocalRepository;

/// File name of the catalog index at the repository root.
pub const INDEX_FILE: &str = "models_index.json";

/// File name of the per-release metadata record.
pub const META_FILE: &str = "model.json";

/// Errors surfaced by repository operations.
///
/// Malformed stored bytes are not an error: the serialization engine
/// absorbs them. Backend failures carry the underlying cause and are
/// left to the caller's retry policy; nothing is retried internally.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The requested release or artifact does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// I/O or transport failure from the storage backend
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

// Lets implementations use `?` directly on tokio::fs results.
impl From<std::io::Error> for RepoError {
    fn from(err: std::io::Error) -> Self {
        RepoError::Backend(err.into())
    }
}

impl RepoError {
    /// True if this error is the not-found case
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound(_))
    }
}

/// Contract every storage backend satisfies.
///
/// All operations are async I/O; none are atomic across a caller's
/// load-modify-save sequence. Concurrent saves are last-write-wins.
#[async_trait]
pub trait ModelRepository: Send + Sync {
    /// Human-readable backend description, for logs
    fn describe(&self) -> String;

    /// Load the catalog index; an empty index if none was ever written.
    async fn load_index(&self) -> RepoResult<ModelIndex>;

    /// Serialize and overwrite the index, creating structure as needed.
    async fn save_index(&self, index: &ModelIndex) -> RepoResult<()>;

    /// Load one release's metadata through the serialization engine.
    ///
    /// Fails with [`RepoError::NotFound`] if the release does not exist.
    async fn load_meta(&self, model_id: &str, version: &str) -> RepoResult<ModelMeta>;

    /// Serialize and write one release's metadata.
    async fn save_meta(&self, model_id: &str, version: &str, meta: &ModelMeta) -> RepoResult<()>;

    /// Whether a directory exists under the repository root.
    async fn dir_exists(&self, relative: &str) -> RepoResult<bool>;

    /// Create a directory (and parents) under the repository root.
    async fn ensure_dir(&self, relative: &str) -> RepoResult<()>;

    /// Recursively list files under a directory, as paths relative to it.
    ///
    /// An absent directory yields an empty listing, not an error.
    async fn list_files(&self, relative_dir: &str) -> RepoResult<Vec<String>>;

    /// Copy a local file into the repository.
    async fn upload_file(&self, relative: &str, local_source: &Path) -> RepoResult<()>;

    /// Copy a repository file to a local destination.
    ///
    /// Fails with [`RepoError::NotFound`] if the source is absent.
    async fn download_file(&self, relative: &str, local_dest: &Path) -> RepoResult<()>;

    /// Remove an entire release subtree.
    ///
    /// Returns false, not an error, if the release never existed.
    async fn delete_version(&self, model_id: &str, version: &str) -> RepoResult<bool>;
}

/// Repository-relative path of a release's directory.
pub fn version_dir(model_id: &str, version: &str) -> String {
    format!("{}/{}", model_id, version)
}

/// Repository-relative path of a release's metadata file.
pub fn meta_path(model_id: &str, version: &str) -> String {
    format!("{}/{}/{}", model_id, version, META_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths() {
        assert_eq!(version_dir("m-1", "1.0.0"), "m-1/1.0.0");
        assert_eq!(meta_path("m-1", "1.0.0"), "m-1/1.0.0/model.json");
    }

    #[test]
    fn test_not_found_predicate() {
        assert!(RepoError::NotFound("x".to_string()).is_not_found());
        assert!(!RepoError::Backend(anyhow::anyhow!("io")).is_not_found());
    }
}
