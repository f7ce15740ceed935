//! Configuration for the repository root.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variable (MODELSHELF_REPO: a directory or an http(s) URL)
//! 2. Config file (.modelshelf/config.yaml)
//! 3. Default (~/.modelshelf/repository)
//!
//! Config file discovery:
//! - Searches current directory and parents for .modelshelf/config.yaml,
//!   then falls back to ~/.modelshelf/config.yaml
//! - A relative `root` in the config file is resolved against the config
//!   file's parent directory

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::repo::{HttpRepository, LocalRepository, ModelRepository};

/// Environment variable naming the repository root or URL.
pub const REPO_ENV_VAR: &str = "MODELSHELF_REPO";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Shared-folder repository root (directory path)
    #[serde(default)]
    pub root: Option<String>,

    /// HTTP repository base URL; takes precedence over `root` when both set
    #[serde(default)]
    pub url: Option<String>,
}

/// The resolved backend choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryLocation {
    /// Local or network-shared directory
    Local(PathBuf),
    /// HTTP endpoint base URL
    Http(String),
}

impl RepositoryLocation {
    /// Interpret a raw location string: URLs become HTTP, anything else
    /// is a directory path.
    pub fn from_str(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Http(raw.to_string())
        } else {
            Self::Local(PathBuf::from(raw))
        }
    }
}

/// Find a config file by searching the current directory and parents,
/// then the home directory.
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let candidate = current.join(".modelshelf").join("config.yaml");
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                break;
            }
        }
    }

    let home = dirs::home_dir()?.join(".modelshelf").join("config.yaml");
    home.exists().then_some(home)
}

/// Load and parse a config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Resolve the repository location from all configuration sources.
pub fn resolve_location() -> Result<RepositoryLocation> {
    if let Ok(raw) = std::env::var(REPO_ENV_VAR) {
        if !raw.trim().is_empty() {
            return Ok(RepositoryLocation::from_str(raw.trim()));
        }
    }

    if let Some(config_path) = find_config_file() {
        let config = load_config_file(&config_path)?;
        let base = config_path.parent().unwrap_or(Path::new("."));

        if let Some(url) = config.url.filter(|u| !u.trim().is_empty()) {
            return Ok(RepositoryLocation::Http(url.trim().to_string()));
        }
        if let Some(root) = config.root.filter(|r| !r.trim().is_empty()) {
            return Ok(RepositoryLocation::Local(resolve_path(base, root.trim())));
        }
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(RepositoryLocation::Local(
        home.join(".modelshelf").join("repository"),
    ))
}

/// Open the configured repository backend.
pub fn open_repository() -> Result<Box<dyn ModelRepository>> {
    Ok(open_at(resolve_location()?))
}

/// Open a repository at an explicit location.
pub fn open_at(location: RepositoryLocation) -> Box<dyn ModelRepository> {
    match location {
        RepositoryLocation::Local(root) => Box::new(LocalRepository::new(root)),
        RepositoryLocation::Http(url) => Box::new(HttpRepository::new(url)),
    }
}
