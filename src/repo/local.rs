//! Repository backed by a local or network-shared directory tree.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::domain::{ModelIndex, ModelMeta};
use crate::schema;

use super::{meta_path, version_dir, ModelRepository, RepoError, RepoResult, INDEX_FILE};

/// Shared-folder repository implementation.
///
/// The root may be a plain local directory or a mounted network share;
/// both look the same from here.
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    /// Create a repository over the given root directory.
    ///
    /// The root is not created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The repository root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a repository-relative path against the root.
    ///
    /// Accepts either separator; components are re-joined with the
    /// platform separator so paths written on Windows resolve on Unix
    /// shares and vice versa. Parent components are skipped so a
    /// relative path can never escape the repository root.
    fn resolve(&self, relative: &str) -> PathBuf {
        let mut path = self.root.clone();
        for part in relative.split(['/', '\\']) {
            if !part.is_empty() && part != "." && part != ".." {
                path.push(part);
            }
        }
        path
    }
}

#[async_trait]
impl ModelRepository for LocalRepository {
    fn describe(&self) -> String {
        format!("local repository at {}", self.root.display())
    }

    async fn load_index(&self) -> RepoResult<ModelIndex> {
        let path = self.resolve(INDEX_FILE);
        if !path.exists() {
            return Ok(ModelIndex::new());
        }

        let raw = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read index: {}", path.display()))?;

        Ok(schema::decode_index(&raw))
    }

    async fn save_index(&self, index: &ModelIndex) -> RepoResult<()> {
        let path = self.resolve(INDEX_FILE);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create repository root: {}", parent.display()))?;
        }

        fs::write(&path, schema::encode_index(index))
            .await
            .with_context(|| format!("Failed to write index: {}", path.display()))?;

        debug!(entries = index.len(), "saved index");
        Ok(())
    }

    async fn load_meta(&self, model_id: &str, version: &str) -> RepoResult<ModelMeta> {
        let relative = meta_path(model_id, version);
        let path = self.resolve(&relative);
        if !path.exists() {
            return Err(RepoError::NotFound(relative));
        }

        let raw = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read metadata: {}", path.display()))?;

        Ok(schema::decode_meta(&raw).meta)
    }

    async fn save_meta(&self, model_id: &str, version: &str, meta: &ModelMeta) -> RepoResult<()> {
        let path = self.resolve(&meta_path(model_id, version));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create release directory: {}", parent.display()))?;
        }

        fs::write(&path, schema::encode_meta(meta))
            .await
            .with_context(|| format!("Failed to write metadata: {}", path.display()))?;

        debug!(model_id, version, "saved metadata");
        Ok(())
    }

    async fn dir_exists(&self, relative: &str) -> RepoResult<bool> {
        Ok(self.resolve(relative).is_dir())
    }

    async fn ensure_dir(&self, relative: &str) -> RepoResult<()> {
        let path = self.resolve(relative);
        fs::create_dir_all(&path)
            .await
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        Ok(())
    }

    async fn list_files(&self, relative_dir: &str) -> RepoResult<Vec<String>> {
        let base = self.resolve(relative_dir);
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut pending = vec![base.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir)
                .await
                .with_context(|| format!("Failed to list directory: {}", dir.display()))?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                } else if let Ok(rel) = path.strip_prefix(&base) {
                    // Relative paths use forward slashes regardless of host.
                    files.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }

        files.sort();
        Ok(files)
    }

    async fn upload_file(&self, relative: &str, local_source: &Path) -> RepoResult<()> {
        let dest = self.resolve(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::copy(local_source, &dest).await.with_context(|| {
            format!(
                "Failed to upload {} to {}",
                local_source.display(),
                dest.display()
            )
        })?;
        Ok(())
    }

    async fn download_file(&self, relative: &str, local_dest: &Path) -> RepoResult<()> {
        let source = self.resolve(relative);
        if !source.is_file() {
            return Err(RepoError::NotFound(relative.to_string()));
        }

        if let Some(parent) = local_dest.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::copy(&source, local_dest).await.with_context(|| {
            format!(
                "Failed to download {} to {}",
                source.display(),
                local_dest.display()
            )
        })?;
        Ok(())
    }

    async fn delete_version(&self, model_id: &str, version: &str) -> RepoResult<bool> {
        let dir = self.resolve(&version_dir(model_id, version));
        if !dir.exists() {
            return Ok(false);
        }

        fs::remove_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to delete release: {}", dir.display()))?;

        debug!(model_id, version, "deleted release");
        Ok(true)
    }
}
