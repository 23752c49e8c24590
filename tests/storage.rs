use menu_board_api::{
    error::AppError,
    services::upload_service::ensure_image_content_type,
    storage::{ImageStore, extension_for, relative_path_from_url, storage_key, validate_folder},
};

#[test]
fn extension_keeps_known_image_types() {
    assert_eq!(extension_for(Some("Photo.PNG")), "png");
    assert_eq!(extension_for(Some("logo.svg")), "jpg");
    assert_eq!(extension_for(Some("script.exe")), "jpg");
    assert_eq!(extension_for(Some("no-extension")), "jpg");
    assert_eq!(extension_for(None), "jpg");
}

#[test]
fn folder_names_are_restricted() {
    assert!(validate_folder("images").is_ok());
    assert!(validate_folder("menu_banners-2").is_ok());
    assert!(validate_folder("").is_err());
    assert!(validate_folder("../etc").is_err());
    assert!(validate_folder("a/b").is_err());
    assert!(validate_folder(&"x".repeat(65)).is_err());
}

#[test]
fn stored_urls_split_into_folder_and_file() {
    assert_eq!(
        relative_path_from_url("/uploads/images/abc.png"),
        Some(("images".to_string(), "abc.png".to_string()))
    );
    assert_eq!(
        relative_path_from_url("https://cdn.example.com/uploads/banners/x.jpg?v=2"),
        Some(("banners".to_string(), "x.jpg".to_string()))
    );
}

#[test]
fn foreign_and_unsafe_urls_are_ignored() {
    assert_eq!(relative_path_from_url("blob:http://localhost/1234"), None);
    assert_eq!(relative_path_from_url("https://example.com/pic.png"), None);
    assert_eq!(relative_path_from_url("/uploads/images"), None);
    assert_eq!(relative_path_from_url("/uploads/images/a/b.png"), None);
    assert_eq!(relative_path_from_url("/uploads/images/.."), None);
    assert_eq!(relative_path_from_url("/uploads/../secret.txt"), None);
}

#[test]
fn content_type_must_be_an_image_when_present() {
    assert!(ensure_image_content_type(None).is_ok());
    assert!(ensure_image_content_type(Some("image/png")).is_ok());
    assert!(ensure_image_content_type(Some("IMAGE/JPEG")).is_ok());
    assert!(matches!(
        ensure_image_content_type(Some("application/pdf")),
        Err(AppError::BadRequest(_))
    ));
}

#[test]
fn svg_uploads_are_refused() {
    assert!(matches!(
        ensure_image_content_type(Some("image/svg+xml")),
        Err(AppError::BadRequest(_))
    ));
    assert!(ensure_image_content_type(Some("Image/SVG+XML; charset=utf-8")).is_err());
    assert!(ensure_image_content_type(Some("image/png; q=1")).is_ok());
}

#[tokio::test]
async fn svg_file_names_are_stored_as_jpg() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = ImageStore::new(dir.path(), "");

    let url = store.save("images", Some("logo.svg"), b"<svg/>").await?;
    assert!(url.ends_with(".jpg"));
    assert!(!url.contains(".svg"));
    Ok(())
}

#[test]
fn every_spelling_of_a_stored_url_has_one_key() {
    let key = Some("/uploads/images/abc.png".to_string());
    assert_eq!(storage_key("/uploads/images/abc.png"), key);
    assert_eq!(storage_key("/uploads/images/abc.png?x=1"), key);
    assert_eq!(storage_key("/uploads/images/abc.png#top"), key);
    assert_eq!(storage_key("https://cdn.example.com/uploads/images/abc.png"), key);
    assert_eq!(storage_key("blob:http://localhost/abc"), None);
    assert_eq!(storage_key("/uploads/../abc.png"), None);
}

#[tokio::test]
async fn save_then_delete_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = ImageStore::new(dir.path(), "https://menus.example.com/");

    let url = store.save("banners", Some("hero.webp"), b"fake image").await?;
    assert!(url.starts_with("https://menus.example.com/uploads/banners/"));
    assert!(url.ends_with(".webp"));

    let (folder, file) = relative_path_from_url(&url).expect("stored url");
    let on_disk = dir.path().join(&folder).join(&file);
    assert_eq!(std::fs::read(&on_disk)?, b"fake image");

    assert!(store.delete(&url).await?);
    assert!(!on_disk.exists());
    // Second delete finds nothing and is not an error.
    assert!(!store.delete(&url).await?);
    Ok(())
}

#[tokio::test]
async fn save_rejects_empty_files_and_bad_folders() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = ImageStore::new(dir.path(), "");

    assert!(matches!(
        store.save("images", Some("a.png"), b"").await,
        Err(AppError::BadRequest(_))
    ));
    assert!(store.save("../up", Some("a.png"), b"data").await.is_err());

    let url = store.save("images", None, b"data").await?;
    assert!(url.starts_with("/uploads/images/"));
    assert!(url.ends_with(".jpg"));
    Ok(())
}

#[tokio::test]
async fn delete_ignores_urls_outside_the_store() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = ImageStore::new(dir.path(), "");

    assert!(!store.delete("blob:http://localhost/abc").await?);
    assert!(!store.delete("https://elsewhere.example.com/a.png").await?);
    store.delete_quietly("/uploads/images/missing.png").await;
    Ok(())
}
