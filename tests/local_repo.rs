//! Repository Contract Integration Tests
//!
//! Exercises the local backend end-to-end against a temp directory:
//! index lifecycle, metadata round-trips, payload transfer, listing,
//! and release deletion.

use modelshelf::domain::{IndexEntry, ModelMeta, CURRENT_SCHEMA_VERSION};
use modelshelf::repo::{LocalRepository, ModelRepository};
use tempfile::TempDir;

fn test_repo() -> (LocalRepository, TempDir) {
    let temp = TempDir::new().unwrap();
    let repo = LocalRepository::new(temp.path().join("share"));
    (repo, temp)
}

#[tokio::test]
async fn test_load_index_before_any_write() {
    let (repo, _temp) = test_repo();

    // Never-written repository: empty index, not an error.
    let index = repo.load_index().await.unwrap();
    assert!(index.is_empty());
}

#[tokio::test]
async fn test_index_save_and_reload() {
    let (repo, _temp) = test_repo();

    let mut index = repo.load_index().await.unwrap();
    index.upsert(
        IndexEntry::new("m-1", "Longsword")
            .with_latest_version("1.0.0")
            .with_tag("medieval"),
    );
    repo.save_index(&index).await.unwrap();

    let reloaded = repo.load_index().await.unwrap();
    assert_eq!(reloaded, index);
    assert_eq!(reloaded.get("m-1").unwrap().name, "Longsword");
}

#[tokio::test]
async fn test_meta_round_trip() {
    let (repo, _temp) = test_repo();

    let mut meta = ModelMeta::new("m-1", "Longsword", "1.0.0");
    meta.description = "A sword".to_string();
    meta.payload_paths = vec!["sword.fbx".to_string()];
    meta.vertex_count = 1200;

    repo.save_meta("m-1", "1.0.0", &meta).await.unwrap();
    let loaded = repo.load_meta("m-1", "1.0.0").await.unwrap();
    assert_eq!(loaded, meta);
}

#[tokio::test]
async fn test_load_meta_not_found() {
    let (repo, _temp) = test_repo();

    let err = repo.load_meta("m-1", "9.9.9").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_corrupt_meta_degrades_instead_of_failing() {
    let (repo, temp) = test_repo();

    let dir = temp.path().join("share").join("m-1").join("1.0.0");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("model.json"),
        r#"{"version": "1.0.0", "author": "ana", "vertexCou"#,
    )
    .unwrap();

    let meta = repo.load_meta("m-1", "1.0.0").await.unwrap();
    assert_eq!(meta.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(meta.version, "1.0.0");
    assert_eq!(meta.author, "ana");
    assert!(meta.payload_paths.is_empty());
}

#[tokio::test]
async fn test_upload_download_byte_equality() {
    let (repo, temp) = test_repo();

    let source = temp.path().join("sword.fbx");
    let payload = b"binary mesh bytes \x00\x01\x02";
    std::fs::write(&source, payload).unwrap();

    repo.upload_file("m-1/1.0.0/sword.fbx", &source)
        .await
        .unwrap();

    let dest = temp.path().join("out").join("sword.fbx");
    repo.download_file("m-1/1.0.0/sword.fbx", &dest)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), payload);
}

#[tokio::test]
async fn test_download_missing_is_not_found() {
    let (repo, temp) = test_repo();

    let err = repo
        .download_file("m-1/1.0.0/missing.fbx", &temp.path().join("out.fbx"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_files_recursive_and_missing() {
    let (repo, temp) = test_repo();

    // Absent directory: empty listing, not an error.
    assert!(repo.list_files("m-1").await.unwrap().is_empty());

    let source = temp.path().join("f");
    std::fs::write(&source, b"x").unwrap();
    repo.upload_file("m-1/1.0.0/sword.fbx", &source).await.unwrap();
    repo.upload_file("m-1/1.0.0/textures/blade.png", &source)
        .await
        .unwrap();
    repo.upload_file("m-1/1.1.0/sword.fbx", &source).await.unwrap();

    let files = repo.list_files("m-1").await.unwrap();
    assert_eq!(
        files,
        vec![
            "1.0.0/sword.fbx".to_string(),
            "1.0.0/textures/blade.png".to_string(),
            "1.1.0/sword.fbx".to_string(),
        ]
    );

    let files = repo.list_files("m-1/1.0.0").await.unwrap();
    assert_eq!(
        files,
        vec!["sword.fbx".to_string(), "textures/blade.png".to_string()]
    );
}

#[tokio::test]
async fn test_dir_exists_and_ensure_dir() {
    let (repo, _temp) = test_repo();

    assert!(!repo.dir_exists("m-1/1.0.0").await.unwrap());
    repo.ensure_dir("m-1/1.0.0").await.unwrap();
    assert!(repo.dir_exists("m-1/1.0.0").await.unwrap());

    // Idempotent.
    repo.ensure_dir("m-1/1.0.0").await.unwrap();
}

#[tokio::test]
async fn test_delete_version() {
    let (repo, temp) = test_repo();

    // Deleting a release that never existed is false, not an error.
    assert!(!repo.delete_version("m-1", "1.0.0").await.unwrap());

    let meta = ModelMeta::new("m-1", "Longsword", "1.0.0");
    repo.save_meta("m-1", "1.0.0", &meta).await.unwrap();
    let source = temp.path().join("f");
    std::fs::write(&source, b"x").unwrap();
    repo.upload_file("m-1/1.0.0/sword.fbx", &source).await.unwrap();

    assert!(repo.delete_version("m-1", "1.0.0").await.unwrap());
    assert!(repo.load_meta("m-1", "1.0.0").await.unwrap_err().is_not_found());
    assert!(!repo.delete_version("m-1", "1.0.0").await.unwrap());
}

#[tokio::test]
async fn test_callers_see_only_the_contract() {
    // The same flow through a trait object, as UI/service layers use it.
    let temp = TempDir::new().unwrap();
    let repo: Box<dyn ModelRepository> =
        Box::new(LocalRepository::new(temp.path().join("share")));

    let mut index = repo.load_index().await.unwrap();
    index.upsert(IndexEntry::new("m-1", "Longsword").with_latest_version("1.0.0"));
    repo.save_index(&index).await.unwrap();

    let meta = ModelMeta::new("m-1", "Longsword", "1.0.0");
    repo.save_meta("m-1", "1.0.0", &meta).await.unwrap();

    assert_eq!(repo.load_index().await.unwrap().len(), 1);
    assert_eq!(
        repo.load_meta("m-1", "1.0.0").await.unwrap().identity.id,
        "m-1"
    );
}
