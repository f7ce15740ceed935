//! Domain types for the modelshelf catalog.
//!
//! This module contains the core data structures:
//! - Index: the lightweight, team-wide listing of model families
//! - Meta: the full record for a single (model, version) release
//! - Version: strict MAJOR.MINOR.PATCH parsing and ordering
//! - Time: the epoch-tick timestamp representation

pub mod index;
pub mod meta;
pub mod time;
pub mod version;

// Re-export commonly used types
pub use index::{IndexEntry, ModelIndex};
pub use meta::{
    AssetRef, ChangelogEntry, DependencyRef, ModelIdentity, ModelMeta, Note,
    CURRENT_SCHEMA_VERSION,
};
pub use version::{needs_upgrade, Version, UNKNOWN_VERSION};

use serde::{Deserialize, Deserializer};

/// Deserialize a field treating JSON `null` as the type's default.
///
/// Older writers emitted `null` for collections they did not know about;
/// loads must still produce an empty collection, never an absent one.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
