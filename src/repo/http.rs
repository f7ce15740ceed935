//! Repository backed by an HTTP endpoint.
//!
//! Artifacts map one-to-one onto URLs under the base: a GET or PUT of
//! `{base}/{relative-path}` per artifact. Structural checks, listings,
//! and directory creation delegate to the backend's own endpoints under
//! `{base}/api/`. Observable behavior matches the local backend: 404
//! becomes NotFound on loads and downloads, an empty listing on list,
//! and `false` on delete.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::fs;
use tracing::debug;

use crate::domain::{ModelIndex, ModelMeta};
use crate::schema;

use super::{meta_path, version_dir, ModelRepository, RepoError, RepoResult, INDEX_FILE};

/// HTTP repository implementation.
pub struct HttpRepository {
    /// Base URL without a trailing slash
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

/// Response from the `api/exists` endpoint
#[derive(Debug, Deserialize)]
struct ExistsResponse {
    exists: bool,
}

impl HttpRepository {
    /// Create a repository over the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// URL of a repository-relative artifact
    fn artifact_url(&self, relative: &str) -> String {
        format!("{}/{}", self.base_url, relative.trim_start_matches('/'))
    }

    /// URL of a backend API endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint)
    }

    /// GET an artifact's bytes; `None` when the backend reports 404.
    async fn get_artifact(&self, relative: &str) -> Result<Option<Vec<u8>>> {
        let url = self.artifact_url(relative);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .with_context(|| format!("Backend rejected fetch of {}", url))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;
        Ok(Some(bytes.to_vec()))
    }

    /// PUT an artifact's bytes.
    async fn put_artifact(&self, relative: &str, bytes: Vec<u8>) -> Result<()> {
        let url = self.artifact_url(relative);
        self.client
            .put(&url)
            .body(bytes)
            .send()
            .await
            .with_context(|| format!("Failed to upload {}", url))?
            .error_for_status()
            .with_context(|| format!("Backend rejected upload of {}", url))?;
        Ok(())
    }
}

#[async_trait]
impl ModelRepository for HttpRepository {
    fn describe(&self) -> String {
        format!("http repository at {}", self.base_url)
    }

    async fn load_index(&self) -> RepoResult<ModelIndex> {
        match self.get_artifact(INDEX_FILE).await? {
            Some(bytes) => Ok(schema::decode_index(&String::from_utf8_lossy(&bytes))),
            None => Ok(ModelIndex::new()),
        }
    }

    async fn save_index(&self, index: &ModelIndex) -> RepoResult<()> {
        self.put_artifact(INDEX_FILE, schema::encode_index(index).into_bytes())
            .await?;
        debug!(entries = index.len(), "saved index");
        Ok(())
    }

    async fn load_meta(&self, model_id: &str, version: &str) -> RepoResult<ModelMeta> {
        let relative = meta_path(model_id, version);
        match self.get_artifact(&relative).await? {
            Some(bytes) => Ok(schema::decode_meta(&String::from_utf8_lossy(&bytes)).meta),
            None => Err(RepoError::NotFound(relative)),
        }
    }

    async fn save_meta(&self, model_id: &str, version: &str, meta: &ModelMeta) -> RepoResult<()> {
        let relative = meta_path(model_id, version);
        self.put_artifact(&relative, schema::encode_meta(meta).into_bytes())
            .await?;
        debug!(model_id, version, "saved metadata");
        Ok(())
    }

    async fn dir_exists(&self, relative: &str) -> RepoResult<bool> {
        let url = self.api_url("exists");
        let response = self
            .client
            .get(&url)
            .query(&[("dir", relative)])
            .send()
            .await
            .with_context(|| format!("Failed to query {}", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        let parsed: ExistsResponse = response
            .error_for_status()
            .with_context(|| format!("Backend rejected query of {}", url))?
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))?;

        Ok(parsed.exists)
    }

    async fn ensure_dir(&self, relative: &str) -> RepoResult<()> {
        let url = self.api_url("mkdir");
        self.client
            .post(&url)
            .json(&serde_json::json!({ "dir": relative }))
            .send()
            .await
            .with_context(|| format!("Failed to call {}", url))?
            .error_for_status()
            .with_context(|| format!("Backend rejected mkdir of {}", relative))?;
        Ok(())
    }

    async fn list_files(&self, relative_dir: &str) -> RepoResult<Vec<String>> {
        let url = self.api_url("list");
        let response = self
            .client
            .get(&url)
            .query(&[("dir", relative_dir)])
            .send()
            .await
            .with_context(|| format!("Failed to query {}", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let mut files: Vec<String> = response
            .error_for_status()
            .with_context(|| format!("Backend rejected listing of {}", relative_dir))?
            .json()
            .await
            .with_context(|| format!("Failed to parse listing of {}", relative_dir))?;

        files.sort();
        Ok(files)
    }

    async fn upload_file(&self, relative: &str, local_source: &Path) -> RepoResult<()> {
        let bytes = fs::read(local_source)
            .await
            .with_context(|| format!("Failed to read {}", local_source.display()))?;
        self.put_artifact(relative, bytes).await?;
        Ok(())
    }

    async fn download_file(&self, relative: &str, local_dest: &Path) -> RepoResult<()> {
        let bytes = self
            .get_artifact(relative)
            .await?
            .ok_or_else(|| RepoError::NotFound(relative.to_string()))?;

        if let Some(parent) = local_dest.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(local_dest, bytes)
            .await
            .with_context(|| format!("Failed to write {}", local_dest.display()))?;
        Ok(())
    }

    async fn delete_version(&self, model_id: &str, version: &str) -> RepoResult<bool> {
        let url = self.artifact_url(&version_dir(model_id, version));
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .with_context(|| format!("Failed to call delete on {}", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        response
            .error_for_status()
            .with_context(|| format!("Backend rejected delete of {}", url))?;

        debug!(model_id, version, "deleted release");
        Ok(true)
    }
}
