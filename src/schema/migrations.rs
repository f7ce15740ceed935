//! Schema migration transforms.
//!
//! Each transform upgrades an in-memory record by exactly one schema
//! version. Transforms are pure: no I/O, no clock reads. They initialize
//! newly-introduced collections, relocate renamed fields, and never
//! delete data the user might still need.

use anyhow::Result;

use crate::domain::{DependencyRef, ModelMeta, CURRENT_SCHEMA_VERSION};

/// A single one-step upgrade, keyed by the version it upgrades *from*.
type Migration = fn(&mut ModelMeta) -> Result<()>;

/// Ordered migration table; index 0 upgrades v1 to v2.
const MIGRATIONS: &[Migration] = &[migrate_v1_to_v2, migrate_v2_to_v3, migrate_v3_to_v4];

/// Apply the migration chain from the record's version up to current.
///
/// Assumes `meta.schema_version < CURRENT_SCHEMA_VERSION`. On success the
/// record is stamped schema-current. Any failing step aborts the whole
/// chain, leaving the caller to fall back.
pub fn migrate(meta: &mut ModelMeta) -> Result<()> {
    // Version 0 means the discriminant itself predates versioning; treat
    // as the first known schema.
    if meta.schema_version == 0 {
        meta.schema_version = 1;
    }

    while meta.schema_version < CURRENT_SCHEMA_VERSION {
        let from = meta.schema_version;
        let step = MIGRATIONS
            .get((from - 1) as usize)
            .ok_or_else(|| anyhow::anyhow!("no migration registered for schema v{}", from))?;
        step(meta)?;
        meta.schema_version = from + 1;
    }

    Ok(())
}

/// v2 introduced browsing extraction: materials, textures, external
/// asset ids, and a dedicated preview image field.
fn migrate_v1_to_v2(meta: &mut ModelMeta) -> Result<()> {
    // Collections are already materialized as empty by decode; adopt the
    // first screenshot as the preview when none was chosen.
    if meta.preview_image_path.is_empty() {
        if let Some(first) = meta.image_paths.first() {
            meta.preview_image_path = first.clone();
        }
    }
    Ok(())
}

/// v3 introduced notes and the changelog, and promoted the install path
/// out of the open `extra` mapping where early writers stashed it.
fn migrate_v2_to_v3(meta: &mut ModelMeta) -> Result<()> {
    if meta.install_path.is_empty() {
        if let Some(legacy) = meta.extra.get("installPath") {
            meta.install_path = legacy.clone();
        }
    }
    // The legacy extra key stays in place: transforms do not delete data.
    // The changelog itself stays empty; transforms initialize new
    // collections, they do not invent entries for them.
    Ok(())
}

/// v4 introduced detailed dependencies and per-file import settings.
fn migrate_v3_to_v4(meta: &mut ModelMeta) -> Result<()> {
    if meta.dependencies_detailed.is_empty() {
        meta.dependencies_detailed = meta
            .dependencies
            .iter()
            .map(|id| DependencyRef {
                id: id.clone(),
                type_name: String::new(),
                name: String::new(),
            })
            .collect();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1_fixture() -> ModelMeta {
        let mut meta = ModelMeta::new("m-1", "Sword", "1.0.0");
        meta.schema_version = 1;
        meta.author = "ana".to_string();
        meta.created_time = 100;
        meta.image_paths = vec!["shots/front.png".to_string(), "shots/back.png".to_string()];
        meta.dependencies = vec!["guid-a".to_string(), "guid-b".to_string()];
        meta.extra
            .insert("installPath".to_string(), "Assets/Models/Sword".to_string());
        meta
    }

    #[test]
    fn test_v1_to_v2_adopts_preview() {
        let mut meta = v1_fixture();
        migrate_v1_to_v2(&mut meta).unwrap();
        assert_eq!(meta.preview_image_path, "shots/front.png");

        // An explicit preview is left alone.
        let mut meta = v1_fixture();
        meta.preview_image_path = "shots/back.png".to_string();
        migrate_v1_to_v2(&mut meta).unwrap();
        assert_eq!(meta.preview_image_path, "shots/back.png");
    }

    #[test]
    fn test_v2_to_v3_promotes_install_path() {
        let mut meta = v1_fixture();
        meta.schema_version = 2;
        migrate_v2_to_v3(&mut meta).unwrap();

        assert_eq!(meta.install_path, "Assets/Models/Sword");
        // Source data is retained, not deleted.
        assert_eq!(
            meta.extra.get("installPath").map(String::as_str),
            Some("Assets/Models/Sword")
        );
    }

    #[test]
    fn test_v2_to_v3_leaves_changelog_empty() {
        let mut meta = v1_fixture();
        meta.schema_version = 2;
        migrate_v2_to_v3(&mut meta).unwrap();

        // New collections are initialized, never populated with
        // invented entries.
        assert!(meta.changelog.is_empty());
        assert!(meta.notes.is_empty());
    }

    #[test]
    fn test_v3_to_v4_backfills_detailed_dependencies() {
        let mut meta = v1_fixture();
        meta.schema_version = 3;
        migrate_v3_to_v4(&mut meta).unwrap();

        assert_eq!(meta.dependencies_detailed.len(), 2);
        assert_eq!(meta.dependencies_detailed[0].id, "guid-a");
        assert_eq!(meta.dependencies_detailed[1].id, "guid-b");
        // Raw list is untouched.
        assert_eq!(meta.dependencies.len(), 2);
    }

    #[test]
    fn test_full_chain_from_v1() {
        let mut meta = v1_fixture();
        migrate(&mut meta).unwrap();

        assert_eq!(meta.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(meta.preview_image_path, "shots/front.png");
        assert_eq!(meta.install_path, "Assets/Models/Sword");
        assert_eq!(meta.dependencies_detailed.len(), 2);
        assert!(meta.changelog.is_empty());
    }

    #[test]
    fn test_version_zero_treated_as_first_schema() {
        let mut meta = v1_fixture();
        meta.schema_version = 0;
        migrate(&mut meta).unwrap();
        assert_eq!(meta.schema_version, CURRENT_SCHEMA_VERSION);
    }
}
