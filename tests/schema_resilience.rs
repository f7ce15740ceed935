//! Serialization Resilience Integration Tests
//!
//! The engine's contract: a usable, schema-current record comes back
//! from every input, whether current, stale, null-ridden, truncated,
//! or empty.

use modelshelf::domain::{AssetRef, ModelMeta, Note, CURRENT_SCHEMA_VERSION};
use modelshelf::schema::{decode_meta, encode_meta, Fidelity};

#[test]
fn test_full_record_round_trip() {
    let mut meta = ModelMeta::new("m-1", "Longsword", "1.2.3");
    meta.description = "A sword".to_string();
    meta.author = "ana".to_string();
    meta.created_time = 638_000_000_000_000_000;
    meta.updated_time = 638_000_000_000_000_001;
    meta.upload_time = 638_000_000_000_000_002;
    meta.payload_paths = vec!["sword.fbx".to_string()];
    meta.materials = vec![AssetRef {
        external_id: "guid-1".to_string(),
        name: "Blade".to_string(),
        relative_path: "materials/blade.mat".to_string(),
        type_name: "Material".to_string(),
    }];
    meta.external_asset_ids = vec!["guid-1".to_string()];
    meta.image_paths = vec!["shots/front.png".to_string()];
    meta.preview_image_path = "shots/front.png".to_string();
    meta.install_path = "Assets/Models/Sword".to_string();
    meta.relative_path = "m-1/1.2.3".to_string();
    meta.notes = vec![Note {
        author: "rev".to_string(),
        message: "approved".to_string(),
        created_time: 7,
        context: "preview".to_string(),
        tag: "approved".to_string(),
    }];
    meta.dependencies = vec!["guid-2".to_string()];
    meta.vertex_count = 1200;
    meta.triangle_count = 2400;

    let decoded = decode_meta(&encode_meta(&meta));
    assert_eq!(decoded.fidelity, Fidelity::Current);
    // Every field, including the still-empty collections, compares equal.
    assert_eq!(decoded.meta, meta);
}

#[test]
fn test_stale_schema_with_null_collections() {
    let raw = r#"{
        "schemaVersion": 1,
        "identity": {"id": "m-1", "name": "Longsword"},
        "version": "1.0.0",
        "description": "old record",
        "imagePaths": ["shots/front.png"],
        "payloadPaths": null,
        "materials": null,
        "textures": null,
        "externalAssetIds": null,
        "notes": null,
        "dependencies": null,
        "dependenciesDetailed": null,
        "extra": null,
        "perFileImportSettings": null,
        "changelog": null
    }"#;

    let decoded = decode_meta(raw);
    assert_eq!(decoded.fidelity, Fidelity::Migrated);

    let meta = decoded.meta;
    assert_eq!(meta.schema_version, CURRENT_SCHEMA_VERSION);
    // Every collection present, at worst empty.
    assert!(meta.payload_paths.is_empty());
    assert!(meta.materials.is_empty());
    assert!(meta.textures.is_empty());
    assert!(meta.external_asset_ids.is_empty());
    assert!(meta.notes.is_empty());
    assert!(meta.dependencies.is_empty());
    assert!(meta.dependencies_detailed.is_empty());
    assert!(meta.extra.is_empty());
    assert!(meta.per_file_import_settings.is_empty());
    // Migration initializes new collections but never invents entries.
    assert!(meta.changelog.is_empty());
    // Field conversion still runs.
    assert_eq!(meta.preview_image_path, "shots/front.png");
}

#[test]
fn test_migration_preserves_user_data() {
    let raw = r#"{
        "schemaVersion": 2,
        "identity": {"id": "m-1", "name": "Longsword"},
        "version": "2.0.0",
        "author": "ana",
        "dependencies": ["guid-a", "guid-b"],
        "extra": {"installPath": "Assets/Models/Sword", "origin": "kitbash"}
    }"#;

    let meta = decode_meta(raw).meta;
    assert_eq!(meta.install_path, "Assets/Models/Sword");
    assert_eq!(meta.dependencies, vec!["guid-a", "guid-b"]);
    assert_eq!(meta.dependencies_detailed.len(), 2);
    // The legacy extra keys survive.
    assert_eq!(meta.extra.len(), 2);
}

#[test]
fn test_malformed_text_never_raises() {
    let inputs = [
        "not json",
        "{",
        "[1, 2, 3]",
        "\"just a string\"",
        "null",
        "{\"identity\": [\"wrong\", \"shape\"]}",
    ];

    for raw in inputs {
        let decoded = decode_meta(raw);
        assert_eq!(
            decoded.meta.schema_version, CURRENT_SCHEMA_VERSION,
            "input {:?}",
            raw
        );
    }
}

#[test]
fn test_malformed_text_recovers_scalars() {
    let raw = r#"{
        "schemaVersion": 4,
        "version": "2.1.0",
        "description": "A big sword",
        "author": "ana",
        "installPath": "Assets/Models/Sword",
        "relativePath": "m-1/2.1.0",
        "previewImagePath": "shots/front.png",
        "createdTime": 638000000000000000,
        "updatedTime": 638000000000000001,
        "uploadTime": 638000000000000002,
        "vertexCount": 1200,
        "triangleCount": 2400,
        "payloadPaths": ["sword.fbx", "#; // truncated mid-array

    let decoded = decode_meta(raw);
    assert_eq!(decoded.fidelity, Fidelity::Recovered);

    let meta = decoded.meta;
    assert_eq!(meta.version, "2.1.0");
    assert_eq!(meta.description, "A big sword");
    assert_eq!(meta.author, "ana");
    assert_eq!(meta.install_path, "Assets/Models/Sword");
    assert_eq!(meta.relative_path, "m-1/2.1.0");
    assert_eq!(meta.preview_image_path, "shots/front.png");
    assert_eq!(meta.created_time, 638_000_000_000_000_000);
    assert_eq!(meta.updated_time, 638_000_000_000_000_001);
    assert_eq!(meta.upload_time, 638_000_000_000_000_002);
    assert_eq!(meta.vertex_count, 1200);
    assert_eq!(meta.triangle_count, 2400);
}

#[test]
fn test_empty_input_yields_empty_current_record() {
    for raw in ["", "  ", "\n"] {
        let decoded = decode_meta(raw);
        assert_eq!(decoded.fidelity, Fidelity::Current);
        assert_eq!(decoded.meta, ModelMeta::empty());
    }
}
