//! Per-release metadata records.
//!
//! One `model.json` per (model family, version) pair: the authoritative
//! record for a single release. `schemaVersion` identifies the field set
//! the record was written under and drives migration on load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::null_default;

/// Schema version new records are written with.
///
/// History:
/// - 1: initial field set
/// - 2: materials/textures extraction, external asset ids
/// - 3: notes and changelog
/// - 4: detailed dependencies, per-file import settings
pub const CURRENT_SCHEMA_VERSION: u32 = 4;

/// The full record describing one release of a model family.
///
/// All collection fields tolerate `null` or absence on decode; after a
/// load through the serialization engine every collection is present,
/// at worst empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMeta {
    /// Schema version this record was written with; migration discriminant
    #[serde(default)]
    pub schema_version: u32,

    /// Identity of the owning model family
    #[serde(default, deserialize_with = "null_default")]
    pub identity: ModelIdentity,

    /// Release version ("MAJOR.MINOR.PATCH")
    #[serde(default)]
    pub version: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Who published this release
    #[serde(default)]
    pub author: String,

    /// When the record was first created, in epoch ticks
    #[serde(default)]
    pub created_time: i64,

    /// Last in-place edit, in epoch ticks
    #[serde(default)]
    pub updated_time: i64,

    /// When the payload finished uploading, in epoch ticks
    #[serde(default)]
    pub upload_time: i64,

    /// Asset files of this release, relative to its storage root
    #[serde(default, deserialize_with = "null_default")]
    pub payload_paths: Vec<String>,

    /// Material references extracted for browsing
    #[serde(default, deserialize_with = "null_default")]
    pub materials: Vec<AssetRef>,

    /// Texture references extracted for browsing
    #[serde(default, deserialize_with = "null_default")]
    pub textures: Vec<AssetRef>,

    /// Opaque ids from the consuming project, for installed-detection
    #[serde(default, deserialize_with = "null_default")]
    pub external_asset_ids: Vec<String>,

    /// Screenshot/preview image paths
    #[serde(default, deserialize_with = "null_default")]
    pub image_paths: Vec<String>,

    /// Preferred preview image
    #[serde(default)]
    pub preview_image_path: String,

    /// Suggested destination inside a consuming project
    #[serde(default)]
    pub install_path: String,

    /// Path of the release relative to the repository root
    #[serde(default)]
    pub relative_path: String,

    /// Feedback notes; shared across versions of the same family
    #[serde(default, deserialize_with = "null_default")]
    pub notes: Vec<Note>,

    /// Raw identifiers of referenced-but-not-bundled assets
    #[serde(default, deserialize_with = "null_default")]
    pub dependencies: Vec<String>,

    /// Dependencies with type and display name attached
    #[serde(default, deserialize_with = "null_default")]
    pub dependencies_detailed: Vec<DependencyRef>,

    /// Open mapping for forward-compatible custom fields
    #[serde(default, deserialize_with = "null_default")]
    pub extra: BTreeMap<String, String>,

    /// Import configuration keyed by payload-relative path
    #[serde(default, deserialize_with = "null_default")]
    pub per_file_import_settings: BTreeMap<String, BTreeMap<String, String>>,

    /// Release history
    #[serde(default, deserialize_with = "null_default")]
    pub changelog: Vec<ChangelogEntry>,

    /// Total vertex count across the payload meshes
    #[serde(default)]
    pub vertex_count: u64,

    /// Total triangle count across the payload meshes
    #[serde(default)]
    pub triangle_count: u64,
}

impl ModelMeta {
    /// A fully-initialized, schema-current, empty record.
    ///
    /// Every collection is present and empty; this is the worst case the
    /// serialization engine is allowed to return.
    pub fn empty() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            ..Default::default()
        }
    }

    /// Create a record for a new release
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let mut meta = Self::empty();
        meta.identity = ModelIdentity {
            id: id.into(),
            name: name.into(),
        };
        meta.version = version.into();
        meta
    }
}

/// Identity of a model family: matches the owning index entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelIdentity {
    /// Must equal the owning index entry's id
    #[serde(default)]
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Lightweight reference to an asset inside the payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    /// Identifier in the consuming project
    #[serde(default)]
    pub external_id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Path relative to the release's storage root
    #[serde(default)]
    pub relative_path: String,

    /// Asset type name (e.g. "Material", "Texture2D")
    #[serde(default)]
    pub type_name: String,
}

/// A feedback note attached to a model family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Who wrote the note
    #[serde(default)]
    pub author: String,

    /// The note text
    #[serde(default)]
    pub message: String,

    /// When the note was written, in epoch ticks
    #[serde(default)]
    pub created_time: i64,

    /// What the note refers to (a file, a view, free text)
    #[serde(default)]
    pub context: String,

    /// Classification tag (e.g. "todo", "approved")
    #[serde(default)]
    pub tag: String,
}

/// A dependency with display information attached
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRef {
    /// Raw identifier of the referenced asset
    #[serde(default)]
    pub id: String,

    /// Asset type name
    #[serde(default)]
    pub type_name: String,

    /// Display name
    #[serde(default)]
    pub name: String,
}

/// One release-history line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogEntry {
    /// Version the change shipped in
    #[serde(default)]
    pub version: String,

    /// What changed
    #[serde(default)]
    pub summary: String,

    /// Who made the change
    #[serde(default)]
    pub author: String,

    /// When, in epoch ticks
    #[serde(default)]
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_schema_current() {
        let meta = ModelMeta::empty();
        assert_eq!(meta.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(meta.payload_paths.is_empty());
        assert!(meta.extra.is_empty());
        assert!(meta.changelog.is_empty());
    }

    #[test]
    fn test_null_collections_decode_empty() {
        let json = r#"{
            "schemaVersion": 4,
            "identity": {"id": "m-1", "name": "Sword"},
            "version": "1.0.0",
            "payloadPaths": null,
            "materials": null,
            "textures": null,
            "notes": null,
            "extra": null,
            "perFileImportSettings": null,
            "changelog": null
        }"#;

        let meta: ModelMeta = serde_json::from_str(json).unwrap();
        assert!(meta.payload_paths.is_empty());
        assert!(meta.materials.is_empty());
        assert!(meta.textures.is_empty());
        assert!(meta.notes.is_empty());
        assert!(meta.extra.is_empty());
        assert!(meta.per_file_import_settings.is_empty());
        assert!(meta.changelog.is_empty());
    }

    #[test]
    fn test_wire_field_names() {
        let meta = ModelMeta::new("m-1", "Sword", "1.0.0");
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["schemaVersion"], CURRENT_SCHEMA_VERSION);
        assert_eq!(json["identity"]["id"], "m-1");
        assert!(json.get("payloadPaths").is_some());
        assert!(json.get("previewImagePath").is_some());
        assert!(json.get("perFileImportSettings").is_some());
        assert!(json.get("vertexCount").is_some());
    }

    #[test]
    fn test_full_round_trip_preserves_everything() {
        let mut meta = ModelMeta::new("m-1", "Sword", "1.2.3");
        meta.description = "A sword".to_string();
        meta.author = "ana".to_string();
        meta.created_time = 638_000_000_000_000_000;
        meta.payload_paths = vec!["sword.fbx".to_string(), "textures/blade.png".to_string()];
        meta.materials = vec![AssetRef {
            external_id: "guid-1".to_string(),
            name: "Blade".to_string(),
            relative_path: "materials/blade.mat".to_string(),
            type_name: "Material".to_string(),
        }];
        meta.notes = vec![Note {
            author: "rev".to_string(),
            message: "needs a scabbard".to_string(),
            created_time: 1,
            context: "preview".to_string(),
            tag: "todo".to_string(),
        }];
        meta.extra.insert("origin".to_string(), "kitbash".to_string());
        meta.per_file_import_settings.insert(
            "sword.fbx".to_string(),
            BTreeMap::from([("scale".to_string(), "1.0".to_string())]),
        );
        meta.changelog = vec![ChangelogEntry {
            version: "1.2.3".to_string(),
            summary: "initial".to_string(),
            author: "ana".to_string(),
            timestamp: 2,
        }];
        meta.vertex_count = 1200;
        meta.triangle_count = 2400;

        let json = serde_json::to_string_pretty(&meta).unwrap();
        let back: ModelMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
