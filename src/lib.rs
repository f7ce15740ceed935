//! modelshelf - team-shared catalog of versioned binary model assets
//!
//! A catalog of model families: each family has a stable identity, a
//! sequence of semantically-versioned releases, and per-release metadata
//! (payload file lists, dependency references, notes, changelog). The
//! catalog survives schema evolution without losing previously-written
//! data and works identically over a shared folder or an HTTP endpoint.
//!
//! # Architecture
//!
//! - All persisted artifacts are JSON: one `models_index.json` per
//!   repository root, one `model.json` per release
//! - Metadata loads never hard-fail: old records migrate forward, and
//!   malformed records degrade to best-effort scalar recovery
//! - Storage is behind the [`repo::ModelRepository`] trait; callers
//!   never touch raw bytes
//!
//! # Modules
//!
//! - `domain`: Data structures (index, metadata, versions, ticks)
//! - `schema`: Versioned serialization, migrations, fallback recovery
//! - `repo`: Storage backends (shared folder, HTTP)
//! - `query`: Search and sort over index entries
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Publish a release
//! modelshelf publish --name "Longsword" --version 1.0.0 sword.fbx
//!
//! # Browse the catalog
//! modelshelf list --sort version
//! modelshelf search "sword AND medieval"
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod query;
pub mod repo;
pub mod schema;

// Re-export main types at crate root for convenience
pub use domain::{
    needs_upgrade, IndexEntry, ModelIndex, ModelMeta, Version, CURRENT_SCHEMA_VERSION,
    UNKNOWN_VERSION,
};
pub use query::{entry_matches_advanced, entry_matches_term, sort_entries, SortMode};
pub use repo::{HttpRepository, LocalRepository, ModelRepository, RepoError, RepoResult};
pub use schema::{decode_meta, encode_meta, DecodedMeta, Fidelity};
